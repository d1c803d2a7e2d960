//! Step-wise comparison of field data sequences.

use super::options::SequenceComparisonOptions;
use super::suite::FieldComparisonSuite;
use crate::compare_error::FieldCompareError;
use crate::fields::{FieldDataSequence, FieldDataSequenceSource};
use crate::predicates::PredicateResult;

/// Results of comparing two sequences.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceComparison {
    /// Outcome of comparing the numbers of steps.
    pub step_count_check: PredicateResult,
    /// One suite per compared step, in step order.
    pub steps: Vec<FieldComparisonSuite>,
}

impl SequenceComparison {
    /// Step counts accepted and all compared steps passed.
    pub fn is_success(&self) -> bool {
        self.step_count_check.value && self.steps.iter().all(FieldComparisonSuite::is_success)
    }

    pub fn report(&self) -> String {
        if !self.step_count_check.value && self.steps.is_empty() {
            return self.step_count_check.report.clone();
        }
        let passed = self.steps.iter().filter(|s| s.is_success()).count();
        format!(
            "{} steps compared with {} PASSED, {} FAILED",
            self.steps.len(),
            passed,
            self.steps.len() - passed
        )
    }
}

/// Compare two sequences step by step with `compare_step`.
///
/// Differing step counts fail without comparing any step, unless
/// `ignore_missing_sequence_steps` (common steps are compared and decide
/// the outcome) or `force_sequence_comparison` (common steps are compared,
/// but the comparison fails) is set. Only one step of each sequence is held
/// at a time.
pub fn compare_sequences<S, R, F>(
    source: &mut FieldDataSequence<S>,
    reference: &mut FieldDataSequence<R>,
    options: &SequenceComparisonOptions,
    mut compare_step: F,
) -> Result<SequenceComparison, FieldCompareError>
where
    S: FieldDataSequenceSource,
    R: FieldDataSequenceSource,
    F: FnMut(&S::Data, &R::Data) -> FieldComparisonSuite,
{
    let (num_source, num_reference) = (source.number_of_steps(), reference.number_of_steps());
    let step_count_check = if num_source == num_reference {
        PredicateResult::pass(format!("Both sequences have {num_source} steps"))
    } else {
        let report = format!("Differing number of steps: {num_source} vs. {num_reference}");
        if options.ignore_missing_sequence_steps {
            log::warn!("{report}; comparing the {} common steps", num_source.min(num_reference));
            PredicateResult::pass(report)
        } else if options.force_sequence_comparison {
            log::warn!("{report}; forcing comparison of the common steps");
            PredicateResult::fail(report)
        } else {
            return Ok(SequenceComparison {
                step_count_check: PredicateResult::fail(report),
                steps: Vec::new(),
            });
        }
    };

    let mut steps = Vec::new();
    for (index, pair) in source.iter().zip(reference.iter()).enumerate() {
        let (s, r) = pair;
        let suite = compare_step(&s?, &r?);
        log::debug!("step {index}: {}", suite.report());
        steps.push(suite);
    }
    Ok(SequenceComparison {
        step_count_check,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::FieldDataComparator;
    use crate::data::array::FieldArray;
    use crate::fields::{InMemorySequence, Table, TabularFields};

    fn sequence(values: &[f64]) -> FieldDataSequence<InMemorySequence<TabularFields>> {
        let steps = values
            .iter()
            .map(|&v| TabularFields::new(Table::new(1), vec![("x", FieldArray::from(vec![v]))]).unwrap())
            .collect();
        FieldDataSequence::new(InMemorySequence::new(steps))
    }

    fn compare(
        a: &[f64],
        b: &[f64],
        options: SequenceComparisonOptions,
    ) -> SequenceComparison {
        compare_sequences(&mut sequence(a), &mut sequence(b), &options, |s, r| {
            FieldDataComparator::new(s, r).compare()
        })
        .unwrap()
    }

    #[test]
    fn equal_sequences_pass() {
        let result = compare(&[1.0, 2.0], &[1.0, 2.0], SequenceComparisonOptions::default());
        assert!(result.is_success());
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.report(), "2 steps compared with 2 PASSED, 0 FAILED");
    }

    #[test]
    fn differing_step_counts() {
        let strict = compare(&[1.0, 2.0], &[1.0], SequenceComparisonOptions::default());
        assert!(!strict.is_success());
        assert!(strict.steps.is_empty());
        assert_eq!(strict.report(), "Differing number of steps: 2 vs. 1");

        let ignored = compare(
            &[1.0, 2.0],
            &[1.0],
            SequenceComparisonOptions {
                ignore_missing_sequence_steps: true,
                ..Default::default()
            },
        );
        assert!(ignored.is_success());
        assert_eq!(ignored.steps.len(), 1);

        let forced = compare(
            &[1.0, 2.0],
            &[1.0],
            SequenceComparisonOptions {
                force_sequence_comparison: true,
                ..Default::default()
            },
        );
        assert!(!forced.is_success());
        assert_eq!(forced.steps.len(), 1);
        assert!(forced.steps[0].is_success());
    }

    #[test]
    fn failing_step_fails_the_sequence() {
        let result = compare(&[1.0, 2.0], &[1.0, 3.0], SequenceComparisonOptions::default());
        assert!(!result.is_success());
        assert_eq!(result.report(), "2 steps compared with 1 PASSED, 1 FAILED");
    }
}
