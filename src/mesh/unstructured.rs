//! Meshes with explicit point coordinates and per-type connectivity.

use std::borrow::Cow;
use std::collections::BTreeSet;

use super::{MeshGeometry, MeshTolerances};
use crate::compare_error::FieldCompareError;
use crate::data::tolerance::DEFAULT_BASE_TOLERANCE;
use crate::geometry::BoundingBox;
use crate::topology::cell_type::CellType;
use crate::topology::cells::{CellBlock, Connectivity};
use crate::topology::points::Points;

/// An unstructured mesh: points plus a connectivity block per cell type.
#[derive(Clone, Debug, PartialEq)]
pub struct UnstructuredMesh {
    points: Points,
    cells: Connectivity,
    tolerances: MeshTolerances,
}

impl UnstructuredMesh {
    /// Create a mesh, validating corner counts and point indices.
    ///
    /// Empty cell blocks are dropped; giving the same cell type twice is an
    /// error.
    pub fn new<I>(points: Points, cells: I) -> Result<Self, FieldCompareError>
    where
        I: IntoIterator<Item = (CellType, CellBlock)>,
    {
        let mut connectivity = Connectivity::new();
        let mut seen = BTreeSet::new();
        for (cell_type, block) in cells {
            validate_block(cell_type, &block, points.len())?;
            if !seen.insert(cell_type) {
                return Err(FieldCompareError::DuplicateCellType(cell_type));
            }
            if !block.is_empty() {
                connectivity.insert(cell_type, block);
            }
        }
        let tolerances = Self::default_tolerances(&points);
        Ok(UnstructuredMesh {
            points,
            cells: connectivity,
            tolerances,
        })
    }

    /// Create a mesh from connectivity keyed by VTK cell type ids.
    pub fn from_vtk_ids<I>(points: Points, cells: I) -> Result<Self, FieldCompareError>
    where
        I: IntoIterator<Item = (u8, CellBlock)>,
    {
        let cells = cells
            .into_iter()
            .map(|(id, block)| Ok((CellType::from_id(id)?, block)))
            .collect::<Result<Vec<_>, FieldCompareError>>()?;
        Self::new(points, cells)
    }

    /// Relative tolerance equal to the base tolerance, absolute tolerance
    /// scaled by the bounding box diagonal.
    pub fn default_tolerances(points: &Points) -> MeshTolerances {
        let diagonal = BoundingBox::of(points).map_or(0.0, |b| b.diagonal());
        MeshTolerances {
            absolute: diagonal * DEFAULT_BASE_TOLERANCE,
            relative: DEFAULT_BASE_TOLERANCE,
        }
    }

    pub fn cells(&self) -> &Connectivity {
        &self.cells
    }

    pub(crate) fn set_resolved_tolerances(&mut self, tolerances: MeshTolerances) {
        self.tolerances = tolerances;
    }
}

fn validate_block(
    cell_type: CellType,
    block: &CellBlock,
    num_points: usize,
) -> Result<(), FieldCompareError> {
    if let Some(expected) = cell_type.num_corners() {
        if let Some((cell, corners)) = block.iter().enumerate().find(|(_, c)| c.len() != expected) {
            return Err(FieldCompareError::CornerCountMismatch {
                cell_type,
                cell,
                expected,
                found: corners.len(),
            });
        }
    }
    if let Some(&index) = block.corners().iter().find(|&&i| i >= num_points) {
        return Err(FieldCompareError::PointIndexOutOfRange {
            cell_type,
            index,
            num_points,
        });
    }
    Ok(())
}

impl MeshGeometry for UnstructuredMesh {
    fn points(&self) -> Cow<'_, Points> {
        Cow::Borrowed(&self.points)
    }

    fn cell_types(&self) -> Vec<CellType> {
        self.cells.keys().copied().collect()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        self.cells.get(&cell_type).map(Cow::Borrowed)
    }

    fn tolerances(&self) -> MeshTolerances {
        self.tolerances
    }
}
