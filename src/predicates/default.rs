use super::{ExactEquality, FuzzyEquality, Predicate, PredicateError, PredicateResult};
use crate::data::array::FieldArray;
use crate::data::tolerance::Tolerance;
use std::fmt;

/// Fuzzy comparison if either array holds floating point values, exact
/// comparison otherwise.
#[derive(Clone, Debug, Default)]
pub struct DefaultEquality {
    fuzzy: FuzzyEquality,
}

impl DefaultEquality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relative_tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.fuzzy.set_relative_tolerance(tolerance);
        self
    }

    pub fn with_absolute_tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.fuzzy.set_absolute_tolerance(tolerance);
        self
    }

    pub fn relative_tolerance(&self) -> &Tolerance {
        self.fuzzy.relative_tolerance()
    }

    pub fn absolute_tolerance(&self) -> &Tolerance {
        self.fuzzy.absolute_tolerance()
    }
}

impl Predicate for DefaultEquality {
    fn evaluate(
        &self,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<PredicateResult, PredicateError> {
        if first.has_floats() || second.has_floats() {
            self.fuzzy.evaluate(first, second)
        } else {
            ExactEquality.evaluate(first, second)
        }
    }
}

impl fmt::Display for DefaultEquality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DefaultEquality (abs_tol: {}, rel_tol: {})",
            self.absolute_tolerance(),
            self.relative_tolerance()
        )
    }
}
