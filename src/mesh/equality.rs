//! Domain equality of meshes.

use itertools::Itertools;

use super::{MeshGeometry, MeshTolerances};
use crate::data::array::FieldArray;
use crate::predicates::{FuzzyEquality, Predicate, PredicateResult};

/// Fuzzy comparison of two coordinate arrays with fixed tolerances.
pub(crate) fn compare_arrays(a: &FieldArray, b: &FieldArray, tol: MeshTolerances) -> PredicateResult {
    let predicate = FuzzyEquality::new()
        .with_relative_tolerance(tol.relative)
        .with_absolute_tolerance(tol.absolute);
    predicate
        .evaluate(a, b)
        .unwrap_or_else(|e| PredicateResult::fail(e.to_string()))
}

/// Check whether two meshes describe the same domain.
///
/// Points are compared in order with fuzzy equality; the tolerances default
/// to the minimum of both meshes' tolerances. Cells are compared per type
/// and in order, each cell by its set of corner indices, so cells whose
/// corners are merely rotated still compare equal.
pub fn mesh_equal(
    source: &dyn MeshGeometry,
    target: &dyn MeshGeometry,
    relative_tolerance: Option<f64>,
    absolute_tolerance: Option<f64>,
) -> PredicateResult {
    let defaults = source.tolerances().min(target.tolerances());
    let tol = MeshTolerances {
        absolute: absolute_tolerance.unwrap_or(defaults.absolute),
        relative: relative_tolerance.unwrap_or(defaults.relative),
    };

    let points = compare_arrays(
        &source.points().to_field_array(),
        &target.points().to_field_array(),
        tol,
    );
    if !points.value {
        return PredicateResult::fail(format!("Differing points - '{}'", points.report));
    }

    let cell_types = source.cell_types();
    if cell_types.iter().sorted().ne(target.cell_types().iter().sorted()) {
        return PredicateResult::fail("Differing grid cell types detected");
    }

    for cell_type in cell_types {
        let (Some(a), Some(b)) = (source.connectivity(cell_type), target.connectivity(cell_type))
        else {
            return PredicateResult::fail("Differing grid cell types detected");
        };
        if a.len() != b.len() {
            return PredicateResult::fail(format!(
                "Differing number of cells of type '{cell_type}'"
            ));
        }
        if let Some(cell) = (0..a.len()).find(|&i| a.sorted_cell(i) != b.sorted_cell(i)) {
            log::debug!(
                "cell {cell} of type '{cell_type}' differs: {:?} vs. {:?}",
                a.cell(cell),
                b.cell(cell)
            );
            return PredicateResult::fail(format!(
                "Differing connectivity detected for cell of type '{cell_type}'"
            ));
        }
    }
    PredicateResult::pass("Meshes compare equal")
}
