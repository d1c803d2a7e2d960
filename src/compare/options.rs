//! Configuration of field and mesh comparisons.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::compare_error::FieldCompareError;
use crate::data::field::Field;
use crate::predicates::{DefaultEquality, Predicate};

/// Options shared by all field data comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorOptions {
    /// Fields only present in the reference do not fail the comparison.
    pub ignore_missing_source_fields: bool,
    /// Fields only present in the source do not fail the comparison.
    pub ignore_missing_reference_fields: bool,
}

/// Options of the mesh field comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshComparatorOptions {
    /// Never sort points or cells to make the meshes match.
    pub disable_mesh_reordering: bool,
    /// Keep unconnected points when sorting.
    pub disable_orphan_point_removal: bool,
    /// Never embed the lower-dimensional mesh into the higher dimension.
    pub disable_space_dimension_matching: bool,
    /// Options of the field comparisons.
    pub field: ComparatorOptions,
}

/// Options of sequence comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceComparisonOptions {
    /// Compare the common steps if the step counts differ, and pass if
    /// those compare equal.
    pub ignore_missing_sequence_steps: bool,
    /// Compare the common steps if the step counts differ, but still fail.
    pub force_sequence_comparison: bool,
}

/// Tolerances for a single field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTolerance {
    pub relative: Option<f64>,
    pub absolute: Option<f64>,
}

/// Global and per-field tolerances, used to pick the predicate for each
/// field. Per-field values take precedence; unset values fall back to the
/// defaults of [`DefaultEquality`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceOverrides {
    pub relative: Option<f64>,
    pub absolute: Option<f64>,
    /// Keyed by raw field name.
    pub fields: BTreeMap<String, FieldTolerance>,
}

impl ToleranceOverrides {
    pub fn predicate_for(&self, name: &str) -> DefaultEquality {
        let field = self.fields.get(name).copied().unwrap_or_default();
        let mut predicate = DefaultEquality::new();
        if let Some(rel) = field.relative.or(self.relative) {
            predicate = predicate.with_relative_tolerance(rel);
        }
        if let Some(abs) = field.absolute.or(self.absolute) {
            predicate = predicate.with_absolute_tolerance(abs);
        }
        predicate
    }

    /// Predicate selector for the comparators.
    pub fn select(&self, source: &Field, _reference: &Field) -> Box<dyn Predicate> {
        Box::new(self.predicate_for(source.name()))
    }
}

/// Predicate on raw field names, used to include or exclude fields.
#[derive(Clone)]
pub struct FieldFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl FieldFilter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FieldFilter(Arc::new(f))
    }

    pub fn accept_all() -> Self {
        FieldFilter::new(|_| true)
    }

    pub fn reject_all() -> Self {
        FieldFilter::new(|_| false)
    }

    /// Matches names in which any of the regular expressions matches.
    pub fn matching_any<I, S>(patterns: I) -> Result<Self, FieldCompareError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = RegexSet::new(patterns).map_err(|e| FieldCompareError::InvalidFilter(e.to_string()))?;
        Ok(FieldFilter::new(move |name| set.is_match(name)))
    }

    pub fn matches(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl fmt::Debug for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldFilter(..)")
    }
}
