//! Mesh domains: unstructured meshes, structured grids and lazily
//! transformed views of either.
//!
//! All variants expose their geometry through the [`MeshGeometry`] trait;
//! [`Mesh`] is the closed set of variants used throughout the crate.

pub mod equality;
pub mod structured;
pub mod transformed;
pub mod unstructured;

pub use equality::mesh_equal;
pub use structured::{Extents, ImageMesh, RectilinearMesh, StructuredMesh};
pub use transformed::TransformedMesh;
pub use unstructured::UnstructuredMesh;

use std::borrow::Cow;

use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::data::tolerance::Tolerance;
use crate::predicates::PredicateResult;
use crate::topology::cell_type::CellType;
use crate::topology::cells::CellBlock;
use crate::topology::points::Points;

/// Absolute and relative tolerance used when comparing mesh geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTolerances {
    pub absolute: f64,
    pub relative: f64,
}

impl MeshTolerances {
    /// Component-wise minimum.
    pub fn min(self, other: MeshTolerances) -> MeshTolerances {
        MeshTolerances {
            absolute: self.absolute.min(other.absolute),
            relative: self.relative.min(other.relative),
        }
    }
}

/// Read access to the geometry and topology of a mesh.
pub trait MeshGeometry {
    fn points(&self) -> Cow<'_, Points>;

    /// Cell types present in the mesh, ascending by id.
    fn cell_types(&self) -> Vec<CellType>;

    /// Corner indices of all cells of `cell_type`, `None` if the mesh has
    /// no such cells.
    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>>;

    fn tolerances(&self) -> MeshTolerances;

    fn num_points(&self) -> usize {
        self.points().len()
    }

    fn space_dimension(&self) -> usize {
        self.points().dimension()
    }

    fn num_cells(&self, cell_type: CellType) -> usize {
        self.connectivity(cell_type).map_or(0, |c| c.len())
    }
}

/// Any mesh domain.
#[derive(Clone, Debug)]
pub enum Mesh {
    Unstructured(UnstructuredMesh),
    Structured(StructuredMesh),
    Rectilinear(RectilinearMesh),
    Image(ImageMesh),
    Transformed(TransformedMesh),
}

static_assertions::assert_impl_all!(Mesh: Send, Sync, Clone);

impl From<UnstructuredMesh> for Mesh {
    fn from(mesh: UnstructuredMesh) -> Self {
        Mesh::Unstructured(mesh)
    }
}

impl From<StructuredMesh> for Mesh {
    fn from(mesh: StructuredMesh) -> Self {
        Mesh::Structured(mesh)
    }
}

impl From<RectilinearMesh> for Mesh {
    fn from(mesh: RectilinearMesh) -> Self {
        Mesh::Rectilinear(mesh)
    }
}

impl From<ImageMesh> for Mesh {
    fn from(mesh: ImageMesh) -> Self {
        Mesh::Image(mesh)
    }
}

impl From<TransformedMesh> for Mesh {
    fn from(mesh: TransformedMesh) -> Self {
        Mesh::Transformed(mesh)
    }
}

impl Mesh {
    fn geometry(&self) -> &dyn MeshGeometry {
        match self {
            Mesh::Unstructured(m) => m,
            Mesh::Structured(m) => m,
            Mesh::Rectilinear(m) => m,
            Mesh::Image(m) => m,
            Mesh::Transformed(m) => m,
        }
    }

    /// Whether the (base) mesh is a structured grid. Structured grids are
    /// never reordered for comparison.
    pub fn is_structured(&self) -> bool {
        match self {
            Mesh::Unstructured(_) => false,
            Mesh::Structured(_) | Mesh::Rectilinear(_) | Mesh::Image(_) => true,
            Mesh::Transformed(view) => view.base().is_structured(),
        }
    }

    /// Extents of structured grids; views report none.
    pub fn extents(&self) -> Option<Extents> {
        match self {
            Mesh::Structured(m) => Some(m.extents()),
            Mesh::Rectilinear(m) => Some(m.extents()),
            Mesh::Image(m) => Some(m.extents()),
            Mesh::Unstructured(_) | Mesh::Transformed(_) => None,
        }
    }

    /// The tolerances a freshly constructed mesh of this geometry has.
    pub fn default_tolerances(&self) -> MeshTolerances {
        match self {
            Mesh::Unstructured(m) => UnstructuredMesh::default_tolerances(&m.points()),
            Mesh::Structured(m) => m.default_tolerances(),
            Mesh::Rectilinear(m) => m.default_tolerances(),
            Mesh::Image(m) => m.default_tolerances(),
            Mesh::Transformed(m) => m.default_tolerances(),
        }
    }

    /// Override the tolerances used in domain comparisons. `None` keeps the
    /// current value; [`Tolerance::Deduced`] restores the default, and
    /// dynamic tolerances are evaluated on the point coordinates.
    pub fn set_tolerances(&mut self, absolute: Option<Tolerance>, relative: Option<Tolerance>) {
        let defaults = self.default_tolerances();
        let mut resolved = self.tolerances();
        let resolve = |tol: &Tolerance, default: f64| match tol {
            Tolerance::Fixed(value) => *value,
            Tolerance::Dynamic(f) => {
                let coords = self.points().to_field_array();
                f(&coords, &coords)
            }
            Tolerance::Deduced => default,
        };
        if let Some(tol) = &absolute {
            resolved.absolute = resolve(tol, defaults.absolute);
        }
        if let Some(tol) = &relative {
            resolved.relative = resolve(tol, defaults.relative);
        }
        match self {
            Mesh::Unstructured(m) => m.set_resolved_tolerances(resolved),
            Mesh::Structured(m) => m.set_resolved_tolerances(resolved),
            Mesh::Rectilinear(m) => m.set_resolved_tolerances(resolved),
            Mesh::Image(m) => m.set_resolved_tolerances(resolved),
            Mesh::Transformed(m) => m.set_resolved_tolerances(resolved),
        }
    }

    /// Domain equality. Pairs of structured grids compare extents before
    /// geometry; everything else goes through [`mesh_equal`].
    pub fn equals(&self, other: &Mesh) -> PredicateResult {
        match (self, other) {
            (Mesh::Rectilinear(a), Mesh::Rectilinear(b)) => a.equals(b),
            (Mesh::Image(a), Mesh::Image(b)) => a.equals(b),
            _ => match (self.extents(), other.extents()) {
                (Some(a), Some(b)) => structured::structured_equal(self, a, other, b),
                _ => mesh_equal(self, other, None, None),
            },
        }
    }

    /// Point data as seen through this mesh (identity unless it is a view).
    pub fn transform_point_data(&self, values: &FieldArray) -> FieldArray {
        match self {
            Mesh::Transformed(view) => view.transform_point_data(values),
            _ => values.clone(),
        }
    }

    /// Cell data as seen through this mesh (identity unless it is a view).
    pub fn transform_cell_data(&self, cell_type: CellType, values: &FieldArray) -> FieldArray {
        match self {
            Mesh::Transformed(view) => view.transform_cell_data(cell_type, values),
            _ => values.clone(),
        }
    }

    /// An unstructured copy of this mesh with the same tolerances.
    pub fn to_unstructured(&self) -> Result<UnstructuredMesh, FieldCompareError> {
        let cells = self
            .cell_types()
            .into_iter()
            .filter_map(|ct| self.connectivity(ct).map(|c| (ct, c.into_owned())))
            .collect::<Vec<_>>();
        let mut mesh = UnstructuredMesh::new(self.points().into_owned(), cells)?;
        mesh.set_resolved_tolerances(self.tolerances());
        Ok(mesh)
    }
}

impl MeshGeometry for Mesh {
    fn points(&self) -> Cow<'_, Points> {
        self.geometry().points()
    }

    fn cell_types(&self) -> Vec<CellType> {
        self.geometry().cell_types()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        self.geometry().connectivity(cell_type)
    }

    fn tolerances(&self) -> MeshTolerances {
        self.geometry().tolerances()
    }

    fn num_points(&self) -> usize {
        self.geometry().num_points()
    }

    fn space_dimension(&self) -> usize {
        self.geometry().space_dimension()
    }

    fn num_cells(&self, cell_type: CellType) -> usize {
        self.geometry().num_cells(cell_type)
    }
}
