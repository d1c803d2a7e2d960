//! Deterministic ordering of mesh points.
//!
//! Points are ordered lexicographically by their coordinates, treating
//! coordinates within a tolerance as equal. Points that still coincide are
//! ordered by the centroids of the cells they are a corner of, so that
//! duplicated points (for instance on both sides of an interface) end up in
//! an order that does not depend on their input numbering.

use std::collections::HashMap;
use std::ops::Range;

use super::MeshTransform;
use crate::compare_error::FieldCompareError;
use crate::geometry::{centroid, fuzzy_lex_sort, point_cloud_tolerance, points_coincide};
use crate::mesh::{MeshGeometry, TransformedMesh};
use crate::topology::points::Points;

/// The point ordering used by [`sort_points`]: entry `i` is the index of
/// the point that becomes point `i`.
///
/// No separate exact presort precedes the fuzzy pass: [`fuzzy_lex_sort`]
/// itself starts every axis with an exact sort (ties broken by the
/// remaining coordinates) and only then groups neighbours within `tol`, so
/// the resulting order depends on the coordinates alone, not on the input
/// numbering.
pub fn sorted_point_order(mesh: &dyn MeshGeometry) -> Result<Vec<usize>, FieldCompareError> {
    let points = mesh.points();
    let tol = point_cloud_tolerance(&points);
    let mut order: Vec<usize> = (0..points.len()).collect();
    fuzzy_lex_sort(&mut order, |i| points.point(i), tol);

    let runs = coincident_runs(&order, &points, tol);
    if runs.is_empty() {
        return Ok(order);
    }
    log::warn!(
        "breaking ties between {} groups of coincident points",
        runs.len()
    );

    let mut centroids: HashMap<usize, Vec<Vec<f64>>> = runs
        .iter()
        .flat_map(|run| order[run.clone()].iter().map(|&p| (p, Vec::new())))
        .collect();
    for cell_type in mesh.cell_types() {
        let Some(block) = mesh.connectivity(cell_type) else {
            continue;
        };
        for cell in block.iter() {
            let mut center = None;
            for p in cell {
                if let Some(list) = centroids.get_mut(p) {
                    let c = center.get_or_insert_with(|| centroid(&points, cell));
                    list.push(c.clone());
                }
            }
        }
    }

    for run in runs {
        let mut keys = Vec::with_capacity(run.len());
        for &p in &order[run.clone()] {
            let adjacent = centroids.get(&p).map(Vec::as_slice).unwrap_or_default();
            if adjacent.is_empty() {
                return Err(FieldCompareError::UnresolvableTie(format!(
                    "Could not sort the points: point {p} coincides with other points but is \
                     not connected to any cell. Remove unconnected points \
                     (strip_orphan_points) before sorting."
                )));
            }
            let mut by_position: Vec<usize> = (0..adjacent.len()).collect();
            fuzzy_lex_sort(&mut by_position, |i| adjacent[i].as_slice(), tol);
            keys.push(
                by_position
                    .iter()
                    .flat_map(|&i| adjacent[i].iter().copied())
                    .collect::<Vec<f64>>(),
            );
        }
        let mut local: Vec<usize> = (0..keys.len()).collect();
        fuzzy_lex_sort(&mut local, |i| keys[i].as_slice(), tol);
        let reordered: Vec<usize> = local.iter().map(|&i| order[run.start + i]).collect();
        order[run].copy_from_slice(&reordered);
    }
    Ok(order)
}

/// Maximal runs of consecutive (in `order`) points that coincide.
fn coincident_runs(order: &[usize], points: &Points, tol: f64) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=order.len() {
        let continues =
            i < order.len() && points_coincide(points.point(order[i - 1]), points.point(order[i]), tol);
        if !continues {
            if i - start > 1 {
                runs.push(start..i);
            }
            start = i;
        }
    }
    runs
}

/// Reorder the points into their canonical order.
pub fn sort_points<T: MeshTransform>(input: &T) -> Result<T, FieldCompareError> {
    let mesh = input.shared_mesh();
    let order = sorted_point_order(mesh.as_ref())?;
    let view = TransformedMesh::of(mesh).with_point_permutation(order)?;
    Ok(input.with_transformed_mesh(view.into()))
}
