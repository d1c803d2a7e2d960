//! Tolerance values: fixed numbers, callables evaluated on the compared
//! arrays, or defaults deduced from the data type.

use crate::data::array::{FieldArray, ScalarType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Base factor from which mesh tolerances are derived.
pub const DEFAULT_BASE_TOLERANCE: f64 = 1e-9;

/// Signature of tolerances computed from the two compared arrays.
pub type ToleranceFn = dyn Fn(&FieldArray, &FieldArray) -> f64 + Send + Sync;

/// No default tolerance exists for the given data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Cannot deduce a default tolerance for '{0}' data, please specify one explicitly")]
pub struct ToleranceDeductionError(pub ScalarType);

/// A relative or absolute tolerance.
#[derive(Clone, Default)]
pub enum Tolerance {
    /// A fixed value.
    Fixed(f64),
    /// Evaluated on the pair of arrays being compared.
    Dynamic(Arc<ToleranceFn>),
    /// Deduced from the data: machine epsilon for relative tolerances of
    /// floating point data, zero otherwise.
    #[default]
    Deduced,
}

/// Which of the two tolerance kinds is being resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ToleranceKind {
    Relative,
    Absolute,
}

impl Tolerance {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&FieldArray, &FieldArray) -> f64 + Send + Sync + 'static,
    {
        Tolerance::Dynamic(Arc::new(f))
    }

    /// `factor` times the largest magnitude found in either array.
    pub fn scaled_by_max_magnitude(factor: f64) -> Self {
        Tolerance::dynamic(move |a, b| {
            let max = a.max_abs().unwrap_or(0.0).max(b.max_abs().unwrap_or(0.0));
            factor * max
        })
    }

    /// Evaluate the tolerance for the given pair of arrays.
    pub fn resolve(
        &self,
        kind: ToleranceKind,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<f64, ToleranceDeductionError> {
        match self {
            Tolerance::Fixed(value) => Ok(*value),
            Tolerance::Dynamic(f) => Ok(f(first, second)),
            Tolerance::Deduced => deduce_default(kind, first.scalar_type(), second.scalar_type()),
        }
    }
}

/// Default tolerance for comparing data of the two given types.
pub fn deduce_default(
    kind: ToleranceKind,
    first: ScalarType,
    second: ScalarType,
) -> Result<f64, ToleranceDeductionError> {
    let common = first.promote(second);
    if !common.is_numeric() {
        return Err(ToleranceDeductionError(common));
    }
    Ok(match kind {
        ToleranceKind::Relative => common.epsilon().unwrap_or(0.0),
        ToleranceKind::Absolute => 0.0,
    })
}

impl From<f64> for Tolerance {
    fn from(value: f64) -> Self {
        Tolerance::Fixed(value)
    }
}

impl fmt::Debug for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            Tolerance::Dynamic(_) => f.write_str("Dynamic(..)"),
            Tolerance::Deduced => f.write_str("Deduced"),
        }
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Fixed(v) => write!(f, "{v:?}"),
            Tolerance::Dynamic(_) => f.write_str("dynamic"),
            Tolerance::Deduced => f.write_str("default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduced_defaults_follow_the_data_type() {
        let f = FieldArray::from(vec![1.0f32]);
        let d = FieldArray::from(vec![1.0f64]);
        let i = FieldArray::from(vec![1i64]);
        let tol = Tolerance::Deduced;
        assert_eq!(
            tol.resolve(ToleranceKind::Relative, &f, &f).unwrap(),
            f64::from(f32::EPSILON)
        );
        assert_eq!(tol.resolve(ToleranceKind::Relative, &f, &d).unwrap(), f64::EPSILON);
        assert_eq!(tol.resolve(ToleranceKind::Relative, &i, &i).unwrap(), 0.0);
        assert_eq!(tol.resolve(ToleranceKind::Absolute, &d, &d).unwrap(), 0.0);
    }

    #[test]
    fn text_has_no_default() {
        let t = FieldArray::from(vec!["a"]);
        let err = Tolerance::Deduced
            .resolve(ToleranceKind::Relative, &t, &t)
            .unwrap_err();
        assert_eq!(err, ToleranceDeductionError(ScalarType::Text));
    }

    #[test]
    fn dynamic_tolerance_sees_both_arrays() {
        let a = FieldArray::from(vec![1.0, -4.0]);
        let b = FieldArray::from(vec![2.0]);
        let tol = Tolerance::scaled_by_max_magnitude(0.5);
        assert_eq!(tol.resolve(ToleranceKind::Absolute, &a, &b).unwrap(), 2.0);
        assert_eq!(tol.to_string(), "dynamic");
        assert_eq!(Tolerance::from(1e-3).to_string(), "0.001");
    }
}
