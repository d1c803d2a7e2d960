//! Results of field comparisons.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::options::ComparatorOptions;
use crate::predicates::PredicateResult;

/// Outcome of comparing a single field.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldComparisonStatus {
    /// The predicate returned success.
    Passed,
    /// The predicate returned failure.
    Failed,
    /// The predicate could not be evaluated.
    Error,
    /// The field only exists in the reference.
    MissingSource,
    /// The field only exists in the source.
    MissingReference,
    /// The field was excluded by the inclusion/exclusion filters.
    Filtered,
}

impl FieldComparisonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldComparisonStatus::Passed => "passed",
            FieldComparisonStatus::Failed => "failed",
            FieldComparisonStatus::Error => "error",
            FieldComparisonStatus::MissingSource => "missing_source",
            FieldComparisonStatus::MissingReference => "missing_reference",
            FieldComparisonStatus::Filtered => "filtered",
        }
    }
}

/// Upper case, as used in reports: `PASSED`, `MISSING_SOURCE`, ...
impl fmt::Display for FieldComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// How a field comparison counts towards the suite result.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Passed,
    Failed,
    Skipped,
}

/// Result of comparing one field of the source with its reference.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldComparison {
    /// Display name of the field.
    pub name: String,
    pub status: FieldComparisonStatus,
    /// Description of the predicate used, empty if none was evaluated.
    pub predicate: String,
    pub report: String,
    /// Time spent evaluating the predicate, if one was evaluated.
    pub elapsed: Option<Duration>,
}

impl FieldComparison {
    /// Classification of this result under the given options.
    pub fn outcome(&self, options: &ComparatorOptions) -> ComparisonOutcome {
        match self.status {
            FieldComparisonStatus::Passed => ComparisonOutcome::Passed,
            FieldComparisonStatus::Failed | FieldComparisonStatus::Error => ComparisonOutcome::Failed,
            FieldComparisonStatus::MissingSource if !options.ignore_missing_source_fields => {
                ComparisonOutcome::Failed
            }
            FieldComparisonStatus::MissingReference if !options.ignore_missing_reference_fields => {
                ComparisonOutcome::Failed
            }
            FieldComparisonStatus::MissingSource
            | FieldComparisonStatus::MissingReference
            | FieldComparisonStatus::Filtered => ComparisonOutcome::Skipped,
        }
    }
}

/// All field comparison results of two field data sets, together with the
/// result of their domain check.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldComparisonSuite {
    domain_eq_check: PredicateResult,
    comparisons: Vec<(FieldComparison, ComparisonOutcome)>,
}

impl FieldComparisonSuite {
    pub fn new(
        domain_eq_check: PredicateResult,
        comparisons: Vec<FieldComparison>,
        options: &ComparatorOptions,
    ) -> Self {
        let comparisons = comparisons
            .into_iter()
            .map(|c| {
                let outcome = c.outcome(options);
                (c, outcome)
            })
            .collect();
        FieldComparisonSuite {
            domain_eq_check,
            comparisons,
        }
    }

    /// A suite without field comparisons, failed on the domain check.
    pub fn domain_failure(domain_eq_check: PredicateResult) -> Self {
        FieldComparisonSuite {
            domain_eq_check,
            comparisons: Vec::new(),
        }
    }

    pub fn domain_equality_check(&self) -> &PredicateResult {
        &self.domain_eq_check
    }

    /// Domains are equal and no field comparison failed.
    pub fn is_success(&self) -> bool {
        self.domain_eq_check.value
            && self
                .comparisons
                .iter()
                .all(|(_, o)| *o != ComparisonOutcome::Failed)
    }

    pub fn status(&self) -> ComparisonOutcome {
        if self.is_success() {
            ComparisonOutcome::Passed
        } else {
            ComparisonOutcome::Failed
        }
    }

    fn with_outcome(&self, outcome: ComparisonOutcome) -> impl Iterator<Item = &FieldComparison> + '_ {
        self.comparisons
            .iter()
            .filter(move |(_, o)| *o == outcome)
            .map(|(c, _)| c)
    }

    pub fn passed(&self) -> impl Iterator<Item = &FieldComparison> + '_ {
        self.with_outcome(ComparisonOutcome::Passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FieldComparison> + '_ {
        self.with_outcome(ComparisonOutcome::Failed)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FieldComparison> + '_ {
        self.with_outcome(ComparisonOutcome::Skipped)
    }

    /// All results with their classification, in comparison order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldComparison, ComparisonOutcome)> + '_ {
        self.comparisons.iter().map(|(c, o)| (c, *o))
    }

    /// Result for the field with the given display name.
    pub fn get(&self, name: &str) -> Option<&FieldComparison> {
        self.comparisons.iter().map(|(c, _)| c).find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.comparisons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.is_empty()
    }

    /// One-line summary.
    pub fn report(&self) -> String {
        if !self.domain_eq_check.value {
            return "Domain equality check failed".to_string();
        }
        format!(
            "{} field comparisons with {} PASSED, {} FAILED, {} SKIPPED",
            self.len(),
            self.passed().count(),
            self.failed().count(),
            self.skipped().count()
        )
    }
}
