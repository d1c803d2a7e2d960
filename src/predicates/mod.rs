//! Predicates deciding whether two field arrays are equal.
//!
//! Every predicate returns a [`PredicateResult`] carrying a boolean outcome
//! and a human-readable report. Inputs that cannot be compared at all (for
//! instance text passed to a fuzzy comparison) yield a [`PredicateError`].

mod default;
mod exact;
mod fuzzy;

pub use default::DefaultEquality;
pub use exact::ExactEquality;
pub use fuzzy::FuzzyEquality;

use crate::data::array::FieldArray;
use crate::data::tolerance::ToleranceDeductionError;
use std::fmt;
use thiserror::Error;

/// Outcome of a predicate evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredicateResult {
    pub value: bool,
    pub report: String,
}

impl PredicateResult {
    pub fn pass(report: impl Into<String>) -> Self {
        PredicateResult {
            value: true,
            report: report.into(),
        }
    }

    pub fn fail(report: impl Into<String>) -> Self {
        PredicateResult {
            value: false,
            report: report.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.value
    }

    pub fn report(&self) -> &str {
        &self.report
    }
}

impl From<PredicateResult> for bool {
    fn from(result: PredicateResult) -> bool {
        result.value
    }
}

/// Failure while evaluating a predicate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        PredicateError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ToleranceDeductionError> for PredicateError {
    fn from(err: ToleranceDeductionError) -> Self {
        PredicateError::new(err.to_string())
    }
}

/// A binary check on two field arrays. The `Display` impl describes the
/// predicate and its settings in reports.
pub trait Predicate: fmt::Display + Send + Sync {
    fn evaluate(
        &self,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<PredicateResult, PredicateError>;
}

impl<P: Predicate + ?Sized> Predicate for Box<P> {
    fn evaluate(
        &self,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<PredicateResult, PredicateError> {
        (**self).evaluate(first, second)
    }
}

pub(crate) const ALL_EQUAL_REPORT: &str = "All field values have compared equal";

/// Reconcile `[n]` against `[n, 1]` by treating both as `[n, 1]`.
pub(crate) fn reconcile_shapes(first: &FieldArray, second: &FieldArray) -> (FieldArray, FieldArray) {
    let as_column = |array: &FieldArray| {
        array
            .reshape(vec![array.len(), 1])
            .unwrap_or_else(|_| array.clone())
    };
    match (first.shape(), second.shape()) {
        ([n], [m, 1]) if n == m => (as_column(first), second.clone()),
        ([n, 1], [m]) if n == m => (first.clone(), as_column(second)),
        _ => (first.clone(), second.clone()),
    }
}

/// Failure result for arrays whose shapes differ, if they do.
pub(crate) fn check_shapes(first: &FieldArray, second: &FieldArray) -> Option<PredicateResult> {
    (first.shape() != second.shape()).then(|| {
        PredicateResult::fail(format!(
            "Array shapes not equal: {:?} vs. {:?}",
            first.shape(),
            second.shape()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_vectors_reconcile_with_flat_arrays() {
        let a = FieldArray::from(vec![1.0, 2.0]);
        let b = FieldArray::from(vec![[1.0], [2.0]]);
        let (x, y) = reconcile_shapes(&a, &b);
        assert_eq!(x.shape(), y.shape());
        let (x, y) = reconcile_shapes(&b, &a);
        assert_eq!(x.shape(), &[2, 1]);
        assert_eq!(y.shape(), &[2, 1]);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let a = FieldArray::from(vec![1.0, 2.0]);
        let b = FieldArray::from(vec![1.0]);
        let res = check_shapes(&a, &b).unwrap();
        assert!(!res.is_success());
        assert_eq!(res.report(), "Array shapes not equal: [2] vs. [1]");
    }
}
