//! Removal of points that are not a corner of any cell.

use super::MeshTransform;
use crate::compare_error::FieldCompareError;
use crate::mesh::{MeshGeometry, TransformedMesh};

/// Indices of all points referenced by at least one cell, ascending.
pub fn connected_points(mesh: &dyn MeshGeometry) -> Vec<usize> {
    let mut connected = vec![false; mesh.num_points()];
    for cell_type in mesh.cell_types() {
        if let Some(block) = mesh.connectivity(cell_type) {
            for &p in block.corners() {
                connected[p] = true;
            }
        }
    }
    connected
        .iter()
        .enumerate()
        .filter_map(|(p, &c)| c.then_some(p))
        .collect()
}

pub fn has_orphan_points(mesh: &dyn MeshGeometry) -> bool {
    connected_points(mesh).len() < mesh.num_points()
}

/// Drop unconnected points, keeping the remaining ones in their order.
pub fn strip_orphan_points<T: MeshTransform>(input: &T) -> Result<T, FieldCompareError> {
    let mesh = input.shared_mesh();
    let keep = connected_points(mesh.as_ref());
    if keep.len() == mesh.num_points() {
        return Ok(input.clone());
    }
    log::debug!(
        "removing {} unconnected points",
        mesh.num_points() - keep.len()
    );
    let view = TransformedMesh::of(mesh).with_point_selection(keep)?;
    Ok(input.with_transformed_mesh(view.into()))
}
