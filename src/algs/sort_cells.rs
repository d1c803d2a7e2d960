//! Deterministic ordering of cells.

use super::MeshTransform;
use crate::compare_error::FieldCompareError;
use crate::mesh::{MeshGeometry, TransformedMesh};
use crate::topology::cells::CellBlock;

/// Order cells lexicographically by their ascending corner indices. Cells
/// with equal corner sets keep their relative order.
pub fn sorted_cell_order(block: &CellBlock) -> Vec<usize> {
    let keys: Vec<Vec<usize>> = (0..block.len()).map(|i| block.sorted_cell(i)).collect();
    let mut order: Vec<usize> = (0..block.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    order
}

/// Reorder the cells of every type into their canonical order.
pub fn sort_cells<T: MeshTransform>(input: &T) -> Result<T, FieldCompareError> {
    let mesh = input.shared_mesh();
    let mut view = TransformedMesh::of(mesh);
    for cell_type in mesh.cell_types() {
        if let Some(block) = mesh.connectivity(cell_type) {
            view = view.with_cell_permutation(cell_type, sorted_cell_order(&block))?;
        }
    }
    Ok(input.with_transformed_mesh(view.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_sort_by_corner_sets() {
        let block = CellBlock::from(vec![vec![4, 3, 2], vec![2, 1, 0], vec![0, 2, 1, 5], vec![1, 0]]);
        assert_eq!(sorted_cell_order(&block), vec![3, 1, 2, 0]);
    }
}
