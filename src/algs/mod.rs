//! Canonicalization algorithms for meshes and mesh fields.
//!
//! All transformations are pure: they return a lazily transformed copy of
//! their input (see [`TransformedMesh`](crate::mesh::TransformedMesh)) and
//! work on bare meshes (`Arc<Mesh>`) and on [`MeshFields`] alike, in which
//! case the fields follow the mesh.

pub mod conforming;
pub mod extend;
pub mod merge;
pub mod orphans;
pub mod permutation;
pub mod sort_cells;
pub mod sort_points;

pub use conforming::to_conforming_cell_types;
pub use extend::extend_space_dimension_to;
pub use merge::{MergeOptions, merge, merge_all};
pub use orphans::strip_orphan_points;
pub use sort_cells::sort_cells;
pub use sort_points::sort_points;

use std::sync::Arc;

use crate::compare_error::FieldCompareError;
use crate::fields::MeshFields;
use crate::mesh::Mesh;

/// Inputs the canonicalization algorithms operate on.
pub trait MeshTransform: Clone {
    fn shared_mesh(&self) -> &Arc<Mesh>;

    /// A copy of `self` on the given (transformed) mesh.
    fn with_transformed_mesh(&self, mesh: Mesh) -> Self;
}

impl MeshTransform for Arc<Mesh> {
    fn shared_mesh(&self) -> &Arc<Mesh> {
        self
    }

    fn with_transformed_mesh(&self, mesh: Mesh) -> Self {
        Arc::new(mesh)
    }
}

impl MeshTransform for MeshFields {
    fn shared_mesh(&self) -> &Arc<Mesh> {
        self.mesh()
    }

    fn with_transformed_mesh(&self, mesh: Mesh) -> Self {
        self.with_mesh(mesh)
    }
}

/// Canonical form of a mesh: orphan points removed, points sorted, cells
/// sorted.
pub fn sort<T: MeshTransform>(input: &T) -> Result<T, FieldCompareError> {
    sort_cells(&sort_points(&strip_orphan_points(input)?)?)
}
