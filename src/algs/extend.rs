//! Embedding meshes into higher-dimensional spaces.

use super::MeshTransform;
use crate::compare_error::FieldCompareError;
use crate::mesh::{MeshGeometry, TransformedMesh};

/// Zero-pad point coordinates and vector/tensor fields to `dimension`.
/// Lowering the dimension is an error; the current dimension is a no-op.
pub fn extend_space_dimension_to<T: MeshTransform>(
    dimension: usize,
    input: &T,
) -> Result<T, FieldCompareError> {
    let mesh = input.shared_mesh();
    let current = mesh.space_dimension();
    if dimension < current {
        return Err(FieldCompareError::DimensionReduction {
            from: current,
            to: dimension,
        });
    }
    if dimension == current {
        return Ok(input.clone());
    }
    let view = TransformedMesh::of(mesh).with_space_dimension(dimension)?;
    Ok(input.with_transformed_mesh(view.into()))
}
