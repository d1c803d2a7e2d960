use super::{ALL_EQUAL_REPORT, Predicate, PredicateError, PredicateResult, check_shapes, reconcile_shapes};
use crate::data::array::FieldArray;
use crate::data::tolerance::{Tolerance, ToleranceKind};
use itertools::Itertools;
use std::fmt;

/// Equality up to relative and absolute tolerances.
///
/// Two values `a` and `b` compare equal if
/// `|a - b| <= max(rel * max(|a|, |b|), abs)`. Identical values (including
/// equal infinities) are always equal, `NaN` never is.
#[derive(Clone, Debug, Default)]
pub struct FuzzyEquality {
    relative: Tolerance,
    absolute: Tolerance,
}

impl FuzzyEquality {
    /// Fuzzy equality with deduced tolerances (machine epsilon relative,
    /// zero absolute).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relative_tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.relative = tolerance.into();
        self
    }

    pub fn with_absolute_tolerance(mut self, tolerance: impl Into<Tolerance>) -> Self {
        self.absolute = tolerance.into();
        self
    }

    pub fn relative_tolerance(&self) -> &Tolerance {
        &self.relative
    }

    pub fn absolute_tolerance(&self) -> &Tolerance {
        &self.absolute
    }

    pub fn set_relative_tolerance(&mut self, tolerance: impl Into<Tolerance>) {
        self.relative = tolerance.into();
    }

    pub fn set_absolute_tolerance(&mut self, tolerance: impl Into<Tolerance>) {
        self.absolute = tolerance.into();
    }
}

/// The scalar fuzzy rule shared by field and mesh comparisons.
pub(crate) fn values_close(a: f64, b: f64, rel: f64, abs: f64) -> bool {
    a == b || (a - b).abs() <= (rel * a.abs().max(b.abs())).max(abs)
}

/// Relative deviation of `b` from `a` in percent.
fn deviation_percent(a: f64, b: f64) -> f64 {
    if !a.is_finite() {
        f64::NAN
    } else if a == 0.0 {
        f64::INFINITY
    } else {
        (b - a).abs() / a.abs() * 100.0
    }
}

impl Predicate for FuzzyEquality {
    fn evaluate(
        &self,
        first: &FieldArray,
        second: &FieldArray,
    ) -> Result<PredicateResult, PredicateError> {
        let (first, second) = reconcile_shapes(first, second);
        if let Some(mismatch) = check_shapes(&first, &second) {
            return Ok(mismatch);
        }
        let rel = self.relative.resolve(ToleranceKind::Relative, &first, &second)?;
        let abs = self.absolute.resolve(ToleranceKind::Absolute, &first, &second)?;
        let numbers = |array: &FieldArray| {
            (0..array.num_values())
                .map(|i| array.value(i).as_f64())
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    PredicateError::new(format!(
                        "Fuzzy comparison failed with exception: cannot fuzzy-compare '{}' values",
                        array.scalar_type()
                    ))
                })
        };
        let a = numbers(&first)?;
        let b = numbers(&second)?;
        if a.is_empty() {
            return Ok(PredicateResult::pass(ALL_EQUAL_REPORT));
        }

        let row_size = first.row_size().max(1);
        let mut max_diff = vec![0.0f64; row_size];
        for (row, (ra, rb)) in a.chunks(row_size).zip(b.chunks(row_size)).enumerate() {
            if ra.iter().zip(rb).any(|(&x, &y)| !values_close(x, y, rel, abs)) {
                let percent = ra
                    .iter()
                    .zip(rb)
                    .map(|(&x, &y)| format!("{:.2}", deviation_percent(x, y)))
                    .collect_vec();
                let percent = if first.ndim() <= 1 {
                    percent.join(", ")
                } else {
                    format!("[{}]", percent.join(", "))
                };
                return Ok(PredicateResult::fail(format!(
                    "Deviation above tolerance detected -> {} vs. {} ({percent} %)",
                    first.format_row(row),
                    second.format_row(row)
                )));
            }
            for (k, (&x, &y)) in ra.iter().zip(rb).enumerate() {
                if x != y {
                    max_diff[k] = max_diff[k].max((x - y).abs());
                }
            }
        }
        let max_diff = if first.ndim() <= 1 {
            format!("{:?}", max_diff[0])
        } else {
            format!("[{}]", max_diff.iter().map(|d| format!("{d:?}")).join(", "))
        };
        Ok(PredicateResult::pass(format!(
            "Maximum absolute difference: {max_diff}"
        )))
    }
}

impl fmt::Display for FuzzyEquality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FuzzyEquality (abs_tol: {}, rel_tol: {})",
            self.absolute, self.relative
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_tolerance_boundary() {
        let pred = FuzzyEquality::new().with_relative_tolerance(1e-3);
        let a = FieldArray::from(vec![1.0]);
        let close = FieldArray::from(vec![1.0009]);
        let far = FieldArray::from(vec![1.002]);
        assert!(pred.evaluate(&a, &close).unwrap().is_success());
        let res = pred.evaluate(&a, &far).unwrap();
        assert!(!res.is_success());
        assert!(res.report().contains("0.20 %"), "{}", res.report());
    }

    #[test]
    fn deviation_from_zero_is_infinite() {
        assert_eq!(deviation_percent(0.0, 1.0), f64::INFINITY);
        assert!(deviation_percent(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn text_is_an_error() {
        let t = FieldArray::from(vec!["a"]);
        let pred = FuzzyEquality::new();
        assert!(pred.evaluate(&t, &t).is_err());
        let pred = FuzzyEquality::new()
            .with_relative_tolerance(0.1)
            .with_absolute_tolerance(0.0);
        assert!(pred.evaluate(&t, &t).is_err());
    }

    #[test]
    fn reports_maximum_difference() {
        let pred = FuzzyEquality::new().with_absolute_tolerance(0.5);
        let a = FieldArray::from(vec![1.0, 2.0]);
        let b = FieldArray::from(vec![1.25, 2.0]);
        let res = pred.evaluate(&a, &b).unwrap();
        assert_eq!(res.report(), "Maximum absolute difference: 0.25");
        assert_eq!(
            pred.to_string(),
            "FuzzyEquality (abs_tol: 0.5, rel_tol: default)"
        );
    }
}
