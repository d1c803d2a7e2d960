//! Comparison of fields on meshes that may differ in ordering.

use super::field_data::FieldDataComparator;
use super::options::{FieldFilter, MeshComparatorOptions};
use super::suite::{FieldComparison, FieldComparisonSuite};
use crate::algs::{extend_space_dimension_to, sort_cells, sort_points, strip_orphan_points};
use crate::compare_error::FieldCompareError;
use crate::data::field::Field;
use crate::fields::MeshFields;
use crate::mesh::MeshGeometry;
use crate::predicates::{DefaultEquality, Predicate, PredicateResult};

/// Compares the fields of two [`MeshFields`].
///
/// If the meshes do not compare equal as given, the comparator retries on
/// transformed copies: first with matching space dimensions, then with
/// sorted points, then additionally with sorted cells. Structured meshes
/// are never reordered.
pub struct MeshFieldsComparator<'a> {
    source: &'a MeshFields,
    reference: &'a MeshFields,
    inclusion_filter: FieldFilter,
    exclusion_filter: FieldFilter,
    options: MeshComparatorOptions,
}

impl<'a> MeshFieldsComparator<'a> {
    pub fn new(source: &'a MeshFields, reference: &'a MeshFields) -> Self {
        MeshFieldsComparator {
            source,
            reference,
            inclusion_filter: FieldFilter::accept_all(),
            exclusion_filter: FieldFilter::reject_all(),
            options: MeshComparatorOptions::default(),
        }
    }

    pub fn with_inclusion_filter(mut self, filter: FieldFilter) -> Self {
        self.inclusion_filter = filter;
        self
    }

    pub fn with_exclusion_filter(mut self, filter: FieldFilter) -> Self {
        self.exclusion_filter = filter;
        self
    }

    pub fn with_options(mut self, options: MeshComparatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MeshComparatorOptions {
        &self.options
    }

    /// Compare all fields with [`DefaultEquality`].
    pub fn compare(&self) -> FieldComparisonSuite {
        self.compare_with(|_, _| Box::new(DefaultEquality::new()), |_| {}, |_| {})
    }

    /// Compare all fields with the predicates chosen by `selector`.
    ///
    /// `callback` receives every entry of the resulting suite as it becomes
    /// available, skipped (missing or filtered) fields included, and
    /// `reordering_callback` a message for each reordering step taken.
    pub fn compare_with<P, C, O>(
        &self,
        selector: P,
        callback: C,
        mut reordering_callback: O,
    ) -> FieldComparisonSuite
    where
        P: FnMut(&Field, &Field) -> Box<dyn Predicate>,
        C: FnMut(&FieldComparison),
        O: FnMut(&str),
    {
        let (source, reference, check) = self.matching_domains(&mut reordering_callback);
        FieldDataComparator::new(&source, &reference)
            .with_inclusion_filter(self.inclusion_filter.clone())
            .with_exclusion_filter(self.exclusion_filter.clone())
            .with_options(self.options.field)
            .compare_on_checked_domains(check, selector, callback)
    }

    /// Walk the retry ladder until the domains compare equal or all steps
    /// are exhausted. Returns the (possibly transformed) inputs of the last
    /// attempt together with its domain check.
    fn matching_domains<O: FnMut(&str)>(
        &self,
        reordering_callback: &mut O,
    ) -> (MeshFields, MeshFields, PredicateResult) {
        let mut source = self.source.clone();
        let mut reference = self.reference.clone();
        let mut check = domain_check(&source, &reference);
        if check.value {
            return (source, reference, check);
        }

        if !self.options.disable_space_dimension_matching {
            let (s_dim, r_dim) = (source.domain().space_dimension(), reference.domain().space_dimension());
            if s_dim != r_dim {
                log::debug!("extending space dimensions {s_dim} and {r_dim} to {}", s_dim.max(r_dim));
                match extend_both(&source, &reference, s_dim.max(r_dim)) {
                    Ok((s, r)) => {
                        source = s;
                        reference = r;
                        check = domain_check(&source, &reference);
                    }
                    Err(e) => return (source, reference, PredicateResult::fail(e.to_string())),
                }
                if check.value {
                    return (source, reference, check);
                }
            }
        }

        if self.options.disable_mesh_reordering
            || source.domain().is_structured()
            || reference.domain().is_structured()
        {
            return (source, reference, check);
        }

        reordering_callback("Meshes did not compare equal. Retrying with sorted points...");
        log::debug!("retrying with sorted points");
        let strip = !self.options.disable_orphan_point_removal;
        match sorted_points(&source, strip).and_then(|s| Ok((s, sorted_points(&reference, strip)?))) {
            Ok((s, r)) => {
                source = s;
                reference = r;
            }
            Err(e) => return (source, reference, PredicateResult::fail(e.to_string())),
        }
        check = domain_check(&source, &reference);
        if check.value {
            return (source, reference, check);
        }

        reordering_callback("Meshes did not compare equal. Retrying with sorted cells...");
        log::debug!("retrying with sorted cells");
        match sort_cells(&source).and_then(|s| Ok((s, sort_cells(&reference)?))) {
            Ok((s, r)) => {
                source = s;
                reference = r;
            }
            Err(e) => return (source, reference, PredicateResult::fail(e.to_string())),
        }
        check = domain_check(&source, &reference);
        (source, reference, check)
    }
}

fn domain_check(source: &MeshFields, reference: &MeshFields) -> PredicateResult {
    source.domain().equals(reference.domain())
}

fn extend_both(
    source: &MeshFields,
    reference: &MeshFields,
    dimension: usize,
) -> Result<(MeshFields, MeshFields), FieldCompareError> {
    Ok((
        extend_space_dimension_to(dimension, source)?,
        extend_space_dimension_to(dimension, reference)?,
    ))
}

fn sorted_points(fields: &MeshFields, strip_orphans: bool) -> Result<MeshFields, FieldCompareError> {
    if strip_orphans {
        sort_points(&strip_orphan_points(fields)?)
    } else {
        sort_points(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::array::FieldArray;
    use crate::mesh::UnstructuredMesh;
    use crate::topology::cell_type::CellType;
    use crate::topology::cells::CellBlock;
    use crate::topology::points::Points;

    fn line(points: Vec<[f64; 1]>, cells: Vec<[usize; 2]>, values: Vec<f64>) -> MeshFields {
        let mesh = UnstructuredMesh::new(
            Points::from_rows(points),
            [(CellType::Line, CellBlock::from(cells))],
        )
        .unwrap();
        MeshFields::from_mesh(mesh)
            .unwrap()
            .with_point_field("u", FieldArray::from(values))
            .unwrap()
    }

    #[test]
    fn permuted_points_are_sorted_before_comparing() {
        let source = line(vec![[0.0], [1.0], [2.0]], vec![[0, 1], [1, 2]], vec![0.0, 1.0, 2.0]);
        let reference = line(vec![[2.0], [0.0], [1.0]], vec![[1, 2], [2, 0]], vec![2.0, 0.0, 1.0]);

        let mut messages = Vec::new();
        let suite = MeshFieldsComparator::new(&source, &reference).compare_with(
            |_, _| Box::new(DefaultEquality::new()),
            |_| {},
            |m| messages.push(m.to_string()),
        );
        assert!(suite.is_success(), "{}", suite.domain_equality_check().report());
        assert_eq!(
            messages,
            vec!["Meshes did not compare equal. Retrying with sorted points...".to_string()]
        );
    }

    #[test]
    fn disabled_reordering_fails_on_permuted_meshes() {
        let source = line(vec![[0.0], [1.0]], vec![[0, 1]], vec![0.0, 1.0]);
        let reference = line(vec![[1.0], [0.0]], vec![[1, 0]], vec![1.0, 0.0]);
        let suite = MeshFieldsComparator::new(&source, &reference)
            .with_options(MeshComparatorOptions {
                disable_mesh_reordering: true,
                ..Default::default()
            })
            .compare();
        assert!(!suite.is_success());
        assert!(suite.is_empty());
    }
}
