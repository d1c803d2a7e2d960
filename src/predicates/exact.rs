use super::{ALL_EQUAL_REPORT, Predicate, PredicateError, PredicateResult, check_shapes, reconcile_shapes};
use crate::data::array::FieldArray;
use std::fmt;

/// Value-by-value equality without any tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactEquality;

impl Predicate for ExactEquality {
    fn evaluate(
        &self,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<PredicateResult, PredicateError> {
        let (first, second) = reconcile_shapes(first, second);
        if let Some(mismatch) = check_shapes(&first, &second) {
            return Ok(mismatch);
        }
        let rows = if first.is_empty() { 0 } else { first.len() };
        let differing = (0..rows).find(|&row| {
            first
                .row(row)
                .zip(second.row(row))
                .any(|(a, b)| !a.exact_eq(b))
        });
        Ok(match differing {
            Some(row) => PredicateResult::fail(format!(
                "Deviation above tolerance detected -> {} vs. {}",
                first.format_row(row),
                second.format_row(row)
            )),
            None => PredicateResult::pass(ALL_EQUAL_REPORT),
        })
    }
}

impl fmt::Display for ExactEquality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExactEquality")
    }
}
