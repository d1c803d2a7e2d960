//! Data module: field arrays, fields and tolerances

pub mod array;
pub mod field;
pub mod tolerance;

pub use array::{ArrayBuffer, FieldArray, ScalarType, ScalarValue};
pub use field::{Field, FieldLocation};
pub use tolerance::{DEFAULT_BASE_TOLERANCE, Tolerance, ToleranceDeductionError};
