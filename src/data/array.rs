//! Typed, shape-aware arrays holding field values.
//!
//! A [`FieldArray`] stores its values row-major in a tagged [`ArrayBuffer`]
//! behind an `Arc`, so cloning an array (and every lazily transformed view
//! of a mesh) never copies the underlying data. The leading axis indexes the
//! entities of a domain (points, cells or table rows); trailing axes hold the
//! components of vector and tensor fields.

use crate::compare_error::FieldCompareError;
use itertools::Itertools;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Scalar type tag for field arrays.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    F64,
    F32,
    I64,
    I32,
    U64,
    Bool,
    Text,
}

impl ScalarType {
    /// Returns a stable string label for the scalar type.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::F64 => "f64",
            ScalarType::F32 => "f32",
            ScalarType::I64 => "i64",
            ScalarType::I32 => "i32",
            ScalarType::U64 => "u64",
            ScalarType::Bool => "bool",
            ScalarType::Text => "text",
        }
    }

    /// Parse a scalar type from a string label.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "f64" => Some(ScalarType::F64),
            "f32" => Some(ScalarType::F32),
            "i64" => Some(ScalarType::I64),
            "i32" => Some(ScalarType::I32),
            "u64" => Some(ScalarType::U64),
            "bool" => Some(ScalarType::Bool),
            "text" => Some(ScalarType::Text),
            _ => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarType::F64 | ScalarType::F32)
    }

    /// Integer-like types; booleans count as integers here.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarType::I64 | ScalarType::I32 | ScalarType::U64 | ScalarType::Bool
        )
    }

    pub fn is_numeric(self) -> bool {
        self != ScalarType::Text
    }

    /// The type both operands are converted to when combined.
    pub fn promote(self, other: ScalarType) -> ScalarType {
        use ScalarType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Text, _) | (_, Text) => Text,
            (F32, Bool) | (Bool, F32) => F32,
            (a, b) if a.is_float() || b.is_float() => F64,
            (Bool, x) | (x, Bool) => x,
            _ => I64,
        }
    }

    /// Machine epsilon of floating point types.
    pub fn epsilon(self) -> Option<f64> {
        match self {
            ScalarType::F64 => Some(f64::EPSILON),
            ScalarType::F32 => Some(f64::from(f32::EPSILON)),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged, type-erased flat storage of array values.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayBuffer {
    F64(Vec<f64>),
    F32(Vec<f32>),
    I64(Vec<i64>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

/// Evaluate `$body` with `$values` bound to the typed vector of `$buffer`.
macro_rules! with_buffer {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            ArrayBuffer::F64($values) => $body,
            ArrayBuffer::F32($values) => $body,
            ArrayBuffer::I64($values) => $body,
            ArrayBuffer::I32($values) => $body,
            ArrayBuffer::U64($values) => $body,
            ArrayBuffer::Bool($values) => $body,
            ArrayBuffer::Text($values) => $body,
        }
    };
}

/// Like `with_buffer!`, but wraps the result in the same buffer variant.
macro_rules! map_buffer {
    ($buffer:expr, $values:ident => $body:expr) => {
        match $buffer {
            ArrayBuffer::F64($values) => ArrayBuffer::F64($body),
            ArrayBuffer::F32($values) => ArrayBuffer::F32($body),
            ArrayBuffer::I64($values) => ArrayBuffer::I64($body),
            ArrayBuffer::I32($values) => ArrayBuffer::I32($body),
            ArrayBuffer::U64($values) => ArrayBuffer::U64($body),
            ArrayBuffer::Bool($values) => ArrayBuffer::Bool($body),
            ArrayBuffer::Text($values) => ArrayBuffer::Text($body),
        }
    };
}

impl ArrayBuffer {
    pub fn len(&self) -> usize {
        with_buffer!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            ArrayBuffer::F64(_) => ScalarType::F64,
            ArrayBuffer::F32(_) => ScalarType::F32,
            ArrayBuffer::I64(_) => ScalarType::I64,
            ArrayBuffer::I32(_) => ScalarType::I32,
            ArrayBuffer::U64(_) => ScalarType::U64,
            ArrayBuffer::Bool(_) => ScalarType::Bool,
            ArrayBuffer::Text(_) => ScalarType::Text,
        }
    }

    /// A buffer of `len` default values (zero, `false` or empty text).
    pub fn zeros(scalar_type: ScalarType, len: usize) -> Self {
        match scalar_type {
            ScalarType::F64 => ArrayBuffer::F64(vec![0.0; len]),
            ScalarType::F32 => ArrayBuffer::F32(vec![0.0; len]),
            ScalarType::I64 => ArrayBuffer::I64(vec![0; len]),
            ScalarType::I32 => ArrayBuffer::I32(vec![0; len]),
            ScalarType::U64 => ArrayBuffer::U64(vec![0; len]),
            ScalarType::Bool => ArrayBuffer::Bool(vec![false; len]),
            ScalarType::Text => ArrayBuffer::Text(vec![String::new(); len]),
        }
    }

    /// The value at flat position `index`.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn value(&self, index: usize) -> ScalarValue<'_> {
        match self {
            ArrayBuffer::F64(v) => ScalarValue::Float(v[index]),
            ArrayBuffer::F32(v) => ScalarValue::Float(f64::from(v[index])),
            ArrayBuffer::I64(v) => ScalarValue::Int(i128::from(v[index])),
            ArrayBuffer::I32(v) => ScalarValue::Int(i128::from(v[index])),
            ArrayBuffer::U64(v) => ScalarValue::Int(i128::from(v[index])),
            ArrayBuffer::Bool(v) => ScalarValue::Bool(v[index]),
            ArrayBuffer::Text(v) => ScalarValue::Text(&v[index]),
        }
    }

    /// Convert all values to `target`; `None` if the conversion is lossy in
    /// kind (text to numbers, floats to integers, anything to booleans).
    pub fn cast(&self, target: ScalarType) -> Option<ArrayBuffer> {
        if self.scalar_type() == target {
            return Some(self.clone());
        }
        let n = self.len();
        let floats = || (0..n).map(|i| self.value(i).as_f64()).collect::<Option<Vec<_>>>();
        let ints = || (0..n).map(|i| self.value(i).as_int()).collect::<Option<Vec<_>>>();
        Some(match target {
            ScalarType::F64 => ArrayBuffer::F64(floats()?),
            ScalarType::F32 => ArrayBuffer::F32(floats()?.into_iter().map(|v| v as f32).collect()),
            ScalarType::I64 => {
                ArrayBuffer::I64(ints()?.into_iter().map(|v| v.to_i64()).collect::<Option<_>>()?)
            }
            ScalarType::I32 => {
                ArrayBuffer::I32(ints()?.into_iter().map(|v| v.to_i32()).collect::<Option<_>>()?)
            }
            ScalarType::U64 => {
                ArrayBuffer::U64(ints()?.into_iter().map(|v| v.to_u64()).collect::<Option<_>>()?)
            }
            ScalarType::Bool | ScalarType::Text => return None,
        })
    }

    fn append(self, other: ArrayBuffer) -> Option<ArrayBuffer> {
        Some(match (self, other) {
            (ArrayBuffer::F64(mut a), ArrayBuffer::F64(b)) => {
                a.extend(b);
                ArrayBuffer::F64(a)
            }
            (ArrayBuffer::F32(mut a), ArrayBuffer::F32(b)) => {
                a.extend(b);
                ArrayBuffer::F32(a)
            }
            (ArrayBuffer::I64(mut a), ArrayBuffer::I64(b)) => {
                a.extend(b);
                ArrayBuffer::I64(a)
            }
            (ArrayBuffer::I32(mut a), ArrayBuffer::I32(b)) => {
                a.extend(b);
                ArrayBuffer::I32(a)
            }
            (ArrayBuffer::U64(mut a), ArrayBuffer::U64(b)) => {
                a.extend(b);
                ArrayBuffer::U64(a)
            }
            (ArrayBuffer::Bool(mut a), ArrayBuffer::Bool(b)) => {
                a.extend(b);
                ArrayBuffer::Bool(a)
            }
            (ArrayBuffer::Text(mut a), ArrayBuffer::Text(b)) => {
                a.extend(b);
                ArrayBuffer::Text(a)
            }
            _ => return None,
        })
    }
}

macro_rules! impl_buffer_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for ArrayBuffer {
                fn from(values: Vec<$ty>) -> Self {
                    ArrayBuffer::$variant(values)
                }
            }

            impl From<Vec<$ty>> for FieldArray {
                fn from(values: Vec<$ty>) -> Self {
                    FieldArray {
                        shape: vec![values.len()],
                        buffer: Arc::new(ArrayBuffer::$variant(values)),
                    }
                }
            }

            impl<const N: usize> From<Vec<[$ty; N]>> for FieldArray {
                fn from(rows: Vec<[$ty; N]>) -> Self {
                    let shape = vec![rows.len(), N];
                    let values: Vec<$ty> = rows.into_iter().flatten().collect();
                    FieldArray {
                        shape,
                        buffer: Arc::new(ArrayBuffer::$variant(values)),
                    }
                }
            }
        )*
    };
}

impl_buffer_from!(
    f64 => F64,
    f32 => F32,
    i64 => I64,
    i32 => I32,
    u64 => U64,
    bool => Bool,
    String => Text,
);

impl From<Vec<&str>> for FieldArray {
    fn from(values: Vec<&str>) -> Self {
        FieldArray::from(values.into_iter().map(String::from).collect::<Vec<_>>())
    }
}

/// A single array entry, widened to a common representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue<'a> {
    Float(f64),
    Int(i128),
    Bool(bool),
    Text(&'a str),
}

impl ScalarValue<'_> {
    /// Numeric value, with booleans mapped to 0 and 1.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ScalarValue::Float(v) => Some(v),
            ScalarValue::Int(v) => v.to_f64(),
            ScalarValue::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            ScalarValue::Text(_) => None,
        }
    }

    fn as_int(self) -> Option<i128> {
        match self {
            ScalarValue::Int(v) => Some(v),
            ScalarValue::Bool(b) => Some(i128::from(b)),
            ScalarValue::Float(_) | ScalarValue::Text(_) => None,
        }
    }

    /// Exact equality across scalar kinds: numbers compare by value, text
    /// only equals text. `NaN` never compares equal.
    pub fn exact_eq(self, other: ScalarValue<'_>) -> bool {
        match (self, other) {
            (ScalarValue::Text(a), ScalarValue::Text(b)) => a == b,
            (ScalarValue::Text(_), _) | (_, ScalarValue::Text(_)) => false,
            (a, b) => match (a.as_int(), b.as_int()) {
                (Some(x), Some(y)) => x == y,
                _ => a.as_f64() == b.as_f64(),
            },
        }
    }
}

impl fmt::Display for ScalarValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Float(v) => write!(f, "{v:?}"),
            ScalarValue::Int(v) => write!(f, "{v}"),
            ScalarValue::Bool(v) => write!(f, "{v}"),
            ScalarValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// An n-dimensional array of field values (row-major, shared storage).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    shape: Vec<usize>,
    buffer: Arc<ArrayBuffer>,
}

impl FieldArray {
    /// Create an array, checking that `shape` matches the buffer size.
    pub fn new(shape: Vec<usize>, buffer: ArrayBuffer) -> Result<Self, FieldCompareError> {
        let expected: usize = shape.iter().product();
        if expected != buffer.len() {
            return Err(FieldCompareError::InvalidShape(format!(
                "shape {shape:?} requires {expected} values, got {}",
                buffer.len()
            )));
        }
        Ok(FieldArray {
            shape,
            buffer: Arc::new(buffer),
        })
    }

    /// Build a two-dimensional array from equally sized rows.
    pub fn from_nested<T>(rows: Vec<Vec<T>>) -> Result<Self, FieldCompareError>
    where
        Vec<T>: Into<ArrayBuffer>,
    {
        let num_rows = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().find_position(|r| r.len() != width) {
            return Err(FieldCompareError::InvalidShape(format!(
                "row {i} has {} entries, expected {width}",
                row.len()
            )));
        }
        let values: Vec<T> = rows.into_iter().flatten().collect();
        FieldArray::new(vec![num_rows, width], values.into())
    }

    /// An array of the given shape filled with default values.
    pub fn zeros(scalar_type: ScalarType, shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        FieldArray {
            shape,
            buffer: Arc::new(ArrayBuffer::zeros(scalar_type, len)),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Extent of the leading axis (1 for zero-dimensional arrays).
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of values per leading-axis entry.
    pub fn row_size(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    pub fn num_values(&self) -> usize {
        self.buffer.len()
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.buffer.scalar_type()
    }

    pub fn has_floats(&self) -> bool {
        self.scalar_type().is_float()
    }

    pub fn buffer(&self) -> &ArrayBuffer {
        &self.buffer
    }

    /// The value at flat (row-major) position `index`.
    pub fn value(&self, index: usize) -> ScalarValue<'_> {
        self.buffer.value(index)
    }

    /// The values of leading-axis entry `row`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = ScalarValue<'_>> + '_ {
        let size = self.row_size();
        (row * size..(row + 1) * size).map(move |i| self.value(i))
    }

    /// Render one row for reports: a bare value for scalar rows, a
    /// bracketed list otherwise.
    pub fn format_row(&self, row: usize) -> String {
        if self.ndim() <= 1 {
            self.value(row).to_string()
        } else {
            format!("[{}]", self.row(row).join(", "))
        }
    }

    /// Largest absolute value, `None` for text or empty arrays.
    pub fn max_abs(&self) -> Option<f64> {
        (0..self.num_values())
            .map(|i| self.value(i).as_f64().map(f64::abs))
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .reduce(f64::max)
    }

    /// Same values, different shape.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Self, FieldCompareError> {
        let expected: usize = shape.iter().product();
        if expected != self.num_values() {
            return Err(FieldCompareError::InvalidShape(format!(
                "cannot reshape array of shape {:?} into {shape:?}",
                self.shape
            )));
        }
        Ok(FieldArray {
            shape,
            buffer: Arc::clone(&self.buffer),
        })
    }

    /// Gather leading-axis entries; `rows[i]` becomes entry `i` of the result.
    ///
    /// # Panics
    /// Panics if a row index is out of range.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        if self.shape.is_empty() {
            return self.clone();
        }
        let size = self.row_size();
        let buffer = map_buffer!(self.buffer.as_ref(), values => rows
            .iter()
            .flat_map(|&r| values[r * size..(r + 1) * size].iter().cloned())
            .collect());
        let mut shape = self.shape.clone();
        shape[0] = rows.len();
        FieldArray {
            shape,
            buffer: Arc::new(buffer),
        }
    }

    /// Zero-pad vector (`[n, from]`) and tensor (`[n, from, from]` or
    /// `[n, from*from]`) components to `to` dimensions. Other shapes are
    /// returned unchanged.
    pub fn pad_components(&self, from: usize, to: usize) -> Self {
        if from >= to {
            return self.clone();
        }
        let n = self.len();
        let (old, new, shape) = match self.shape.as_slice() {
            [_, c] if *c == from => ((1, from), (1, to), vec![n, to]),
            [_, r, c] if *r == from && *c == from => ((from, from), (to, to), vec![n, to, to]),
            [_, c] if from > 1 && *c == from * from => ((from, from), (to, to), vec![n, to * to]),
            _ => return self.clone(),
        };
        let buffer = map_buffer!(self.buffer.as_ref(), values => embed(values, n, old, new));
        FieldArray {
            shape,
            buffer: Arc::new(buffer),
        }
    }

    /// Append the rows of `other`, promoting both to a common scalar type.
    pub fn concat_rows(&self, other: &FieldArray) -> Result<Self, FieldCompareError> {
        if self.shape.is_empty() || other.shape.is_empty() || self.shape[1..] != other.shape[1..] {
            return Err(FieldCompareError::IncompatibleArrays(format!(
                "shapes {:?} and {:?} cannot be concatenated",
                self.shape, other.shape
            )));
        }
        let target = self.scalar_type().promote(other.scalar_type());
        let incompatible = || {
            FieldCompareError::IncompatibleArrays(format!(
                "cannot combine '{}' and '{}' values",
                self.scalar_type(),
                other.scalar_type()
            ))
        };
        let first = self.buffer.cast(target).ok_or_else(incompatible)?;
        let second = other.buffer.cast(target).ok_or_else(incompatible)?;
        let buffer = first.append(second).ok_or_else(incompatible)?;
        let mut shape = self.shape.clone();
        shape[0] += other.shape[0];
        FieldArray::new(shape, buffer)
    }
}

/// Copy `rows` blocks of `old.0 x old.1` values into default-filled blocks
/// of `new.0 x new.1` values.
fn embed<T: Clone + Default>(
    values: &[T],
    rows: usize,
    old: (usize, usize),
    new: (usize, usize),
) -> Vec<T> {
    let mut out = vec![T::default(); rows * new.0 * new.1];
    for row in 0..rows {
        for i in 0..old.0 {
            for j in 0..old.1 {
                out[row * new.0 * new.1 + i * new.1 + j] =
                    values[row * old.0 * old.1 + i * old.1 + j].clone();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_rules() {
        assert_eq!(ScalarType::F32.promote(ScalarType::F64), ScalarType::F64);
        assert_eq!(ScalarType::I32.promote(ScalarType::F32), ScalarType::F64);
        assert_eq!(ScalarType::Bool.promote(ScalarType::I32), ScalarType::I32);
        assert_eq!(ScalarType::Text.promote(ScalarType::I32), ScalarType::Text);
        assert_eq!(ScalarType::F32.epsilon(), Some(f64::from(f32::EPSILON)));
        assert_eq!(ScalarType::I64.epsilon(), None);
    }

    #[test]
    fn select_rows_gathers_vectors() {
        let a = FieldArray::from(vec![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let b = a.select_rows(&[2, 0]);
        assert_eq!(b.shape(), &[2, 2]);
        assert_eq!(b.format_row(0), "[5.0, 6.0]");
        assert_eq!(b.format_row(1), "[1.0, 2.0]");
    }

    #[test]
    fn pad_vector_and_tensor_components() {
        let v = FieldArray::from(vec![[1i64, 2]]);
        assert_eq!(v.pad_components(2, 3).format_row(0), "[1, 2, 0]");
        let t = FieldArray::new(vec![1, 2, 2], vec![1.0, 2.0, 3.0, 4.0].into()).unwrap();
        let padded = t.pad_components(2, 3);
        assert_eq!(padded.shape(), &[1, 3, 3]);
        assert_eq!(
            padded.format_row(0),
            "[1.0, 2.0, 0.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0]"
        );
        let scalars = FieldArray::from(vec![1.0, 2.0]);
        assert_eq!(scalars.pad_components(2, 3), scalars);
    }

    #[test]
    fn concat_promotes_numeric_types() {
        let a = FieldArray::from(vec![1i32, 2]);
        let b = FieldArray::from(vec![0.5f64]);
        let c = a.concat_rows(&b).unwrap();
        assert_eq!(c.scalar_type(), ScalarType::F64);
        assert_eq!(c.shape(), &[3]);
        let text = FieldArray::from(vec!["x"]);
        assert!(a.concat_rows(&text).is_err());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = FieldArray::from_nested(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, FieldCompareError::InvalidShape(_)));
    }

    #[test]
    fn exact_equality_across_kinds() {
        assert!(ScalarValue::Int(1).exact_eq(ScalarValue::Float(1.0)));
        assert!(ScalarValue::Bool(true).exact_eq(ScalarValue::Int(1)));
        assert!(!ScalarValue::Float(f64::NAN).exact_eq(ScalarValue::Float(f64::NAN)));
        assert!(!ScalarValue::Text("1").exact_eq(ScalarValue::Int(1)));
    }
}
