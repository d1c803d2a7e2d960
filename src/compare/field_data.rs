//! Field-by-field comparison of two field data sets.

use std::time::Instant;

use super::options::{ComparatorOptions, FieldFilter};
use super::suite::{FieldComparison, FieldComparisonStatus, FieldComparisonSuite};
use crate::data::field::Field;
use crate::fields::{FieldData, match_fields};
use crate::predicates::{DefaultEquality, Predicate, PredicateResult};

/// Compares all fields of a source data set with those of a reference.
///
/// Fields are only compared if the domains compare equal. Fields are paired
/// by name (and cell type); fields rejected by the inclusion or exclusion
/// filter are recorded as [`FieldComparisonStatus::Filtered`].
pub struct FieldDataComparator<'a, S: ?Sized, R: ?Sized> {
    source: &'a S,
    reference: &'a R,
    inclusion_filter: FieldFilter,
    exclusion_filter: FieldFilter,
    options: ComparatorOptions,
}

impl<'a, S, R> FieldDataComparator<'a, S, R>
where
    S: FieldData + ?Sized,
    R: FieldData + ?Sized,
{
    pub fn new(source: &'a S, reference: &'a R) -> Self {
        FieldDataComparator {
            source,
            reference,
            inclusion_filter: FieldFilter::accept_all(),
            exclusion_filter: FieldFilter::reject_all(),
            options: ComparatorOptions::default(),
        }
    }

    /// Only compare fields whose name is accepted by `filter`.
    pub fn with_inclusion_filter(mut self, filter: FieldFilter) -> Self {
        self.inclusion_filter = filter;
        self
    }

    /// Do not compare fields whose name is accepted by `filter`.
    pub fn with_exclusion_filter(mut self, filter: FieldFilter) -> Self {
        self.exclusion_filter = filter;
        self
    }

    pub fn with_options(mut self, options: ComparatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Compare all fields with [`DefaultEquality`].
    pub fn compare(&self) -> FieldComparisonSuite {
        self.compare_with(|_, _| Box::new(DefaultEquality::new()), |_| {})
    }

    /// Compare all fields with the predicates chosen by `selector`.
    ///
    /// `callback` receives every entry of the resulting suite, in suite
    /// order: each compared field as soon as it is available, followed by
    /// the fields missing in the source, those missing in the reference and
    /// the filtered ones. Nothing is reported when the domain check fails.
    pub fn compare_with<P, C>(&self, selector: P, callback: C) -> FieldComparisonSuite
    where
        P: FnMut(&Field, &Field) -> Box<dyn Predicate>,
        C: FnMut(&FieldComparison),
    {
        let domain_eq_check = self.source.domain().equals(&self.reference.domain());
        self.compare_on_checked_domains(domain_eq_check, selector, callback)
    }

    /// Field comparisons given the outcome of the domain check.
    pub(crate) fn compare_on_checked_domains<P, C>(
        &self,
        domain_eq_check: PredicateResult,
        mut selector: P,
        mut callback: C,
    ) -> FieldComparisonSuite
    where
        P: FnMut(&Field, &Field) -> Box<dyn Predicate>,
        C: FnMut(&FieldComparison),
    {
        if !domain_eq_check.value {
            log::debug!("domain check failed: {}", domain_eq_check.report);
            return FieldComparisonSuite::domain_failure(domain_eq_check);
        }

        let query = match_fields(self.source.fields(), self.reference.fields());
        log::trace!(
            "matched {} fields, {} only in source, {} only in reference",
            query.matches.len(),
            query.orphans_in_source.len(),
            query.orphans_in_reference.len()
        );

        let mut comparisons = Vec::new();
        let mut filtered = Vec::new();
        for (source, reference) in query.matches {
            if !self.is_selected(source.name()) {
                filtered.push(source);
                continue;
            }
            let predicate = selector(&source, &reference);
            let comparison = compare_field(&source, &reference, predicate.as_ref());
            log::debug!("{}: {}", comparison.name, comparison.status);
            callback(&comparison);
            comparisons.push(comparison);
        }

        let skipped = query
            .orphans_in_reference
            .iter()
            .map(|f| skipped_comparison(f, FieldComparisonStatus::MissingSource, "Missing source field"))
            .chain(query.orphans_in_source.iter().map(|f| {
                skipped_comparison(f, FieldComparisonStatus::MissingReference, "Missing reference field")
            }))
            .chain(filtered.iter().map(|f| {
                skipped_comparison(f, FieldComparisonStatus::Filtered, "Filtered out by given rules")
            }));
        for comparison in skipped {
            callback(&comparison);
            comparisons.push(comparison);
        }

        FieldComparisonSuite::new(domain_eq_check, comparisons, &self.options)
    }

    fn is_selected(&self, name: &str) -> bool {
        self.inclusion_filter.matches(name) && !self.exclusion_filter.matches(name)
    }
}

fn compare_field(source: &Field, reference: &Field, predicate: &dyn Predicate) -> FieldComparison {
    let start = Instant::now();
    let result = predicate.evaluate(source.values(), reference.values());
    let elapsed = start.elapsed();
    match result {
        Ok(result) => FieldComparison {
            name: source.display_name(),
            status: if result.value {
                FieldComparisonStatus::Passed
            } else {
                FieldComparisonStatus::Failed
            },
            predicate: predicate.to_string(),
            report: result.report,
            elapsed: Some(elapsed),
        },
        Err(e) => FieldComparison {
            name: source.display_name(),
            status: FieldComparisonStatus::Error,
            predicate: predicate.to_string(),
            report: format!("Exception raised: {e}"),
            elapsed: None,
        },
    }
}

fn skipped_comparison(field: &Field, status: FieldComparisonStatus, report: &str) -> FieldComparison {
    FieldComparison {
        name: field.display_name(),
        status,
        predicate: String::new(),
        report: report.to_string(),
        elapsed: None,
    }
}
