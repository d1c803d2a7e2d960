//! Lazily transformed views of meshes.
//!
//! A [`TransformedMesh`] wraps a shared base mesh together with an optional
//! point selection, optional per-type cell permutations and an optional
//! higher space dimension. Points, connectivity and field data are
//! transformed on access; the base mesh is never modified or copied.
//! Transforming a view again composes the index maps, so a view never wraps
//! another view.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Mesh, MeshGeometry, MeshTolerances};
use crate::algs::permutation::{UNMAPPED, invert_selection, validate_permutation, validate_selection};
use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::topology::cell_type::CellType;
use crate::topology::cells::CellBlock;
use crate::topology::points::Points;

#[derive(Clone, Debug)]
pub struct TransformedMesh {
    base: Arc<Mesh>,
    /// New point index -> base point index.
    point_map: Option<Vec<usize>>,
    /// Base point index -> new point index, [`UNMAPPED`] for dropped points.
    inverse_point_map: Option<Vec<usize>>,
    /// New cell index -> base cell index, per cell type.
    cell_maps: BTreeMap<CellType, Vec<usize>>,
    space_dimension: Option<usize>,
    /// Set only through [`Mesh::set_tolerances`] on the view. Otherwise the
    /// view reports the tolerances of its base mesh, also after points were
    /// dropped, so tolerances chosen for the input survive canonicalization.
    tolerances: Option<MeshTolerances>,
}

impl TransformedMesh {
    /// An untransformed view of `mesh`. If `mesh` already is a view, the
    /// result continues from its transformations.
    pub fn of(mesh: &Arc<Mesh>) -> Self {
        match mesh.as_ref() {
            Mesh::Transformed(view) => view.clone(),
            _ => TransformedMesh {
                base: Arc::clone(mesh),
                point_map: None,
                inverse_point_map: None,
                cell_maps: BTreeMap::new(),
                space_dimension: None,
                tolerances: None,
            },
        }
    }

    /// The untransformed mesh behind this view.
    pub fn base(&self) -> &Arc<Mesh> {
        &self.base
    }

    /// Keep only the selected points, in the given order. `selection[i]` is
    /// the current index of the point that becomes point `i`. Points
    /// referenced by cells may not be dropped.
    pub fn with_point_selection(mut self, selection: Vec<usize>) -> Result<Self, FieldCompareError> {
        validate_selection(&selection, self.num_points())?;
        let composed = match &self.point_map {
            Some(map) => selection.iter().map(|&j| map[j]).collect(),
            None => selection,
        };
        let inverse = invert_selection(&composed, self.base.num_points());
        for cell_type in self.base.cell_types() {
            let Some(block) = self.base.connectivity(cell_type) else {
                continue;
            };
            if let Some(&p) = block.corners().iter().find(|&&p| inverse[p] == UNMAPPED) {
                return Err(FieldCompareError::InvalidPermutation(format!(
                    "point selection drops point {p}, which is a corner of a '{cell_type}' cell"
                )));
            }
        }
        self.point_map = Some(composed);
        self.inverse_point_map = Some(inverse);
        Ok(self)
    }

    /// Reorder all points; `permutation[i]` is the current index of the point
    /// that becomes point `i`.
    pub fn with_point_permutation(self, permutation: Vec<usize>) -> Result<Self, FieldCompareError> {
        validate_permutation(&permutation, self.num_points())?;
        self.with_point_selection(permutation)
    }

    /// Reorder the cells of one type; `permutation[i]` is the current index
    /// of the cell that becomes cell `i`.
    pub fn with_cell_permutation(
        mut self,
        cell_type: CellType,
        permutation: Vec<usize>,
    ) -> Result<Self, FieldCompareError> {
        validate_permutation(&permutation, self.num_cells(cell_type))?;
        let composed = match self.cell_maps.get(&cell_type) {
            Some(map) => permutation.iter().map(|&j| map[j]).collect(),
            None => permutation,
        };
        self.cell_maps.insert(cell_type, composed);
        Ok(self)
    }

    /// Zero-pad points and vector/tensor fields to `dimension`.
    pub fn with_space_dimension(mut self, dimension: usize) -> Result<Self, FieldCompareError> {
        let current = self.space_dimension();
        if dimension < current {
            return Err(FieldCompareError::DimensionReduction {
                from: current,
                to: dimension,
            });
        }
        self.space_dimension = (dimension > self.base.space_dimension()).then_some(dimension);
        Ok(self)
    }

    pub(crate) fn default_tolerances(&self) -> MeshTolerances {
        self.base.default_tolerances()
    }

    pub(crate) fn set_resolved_tolerances(&mut self, tolerances: MeshTolerances) {
        self.tolerances = Some(tolerances);
    }

    /// Map point data of the base mesh into this view.
    pub fn transform_point_data(&self, values: &FieldArray) -> FieldArray {
        let values = match &self.point_map {
            Some(map) => values.select_rows(map),
            None => values.clone(),
        };
        self.pad(values)
    }

    /// Map cell data of the base mesh into this view.
    pub fn transform_cell_data(&self, cell_type: CellType, values: &FieldArray) -> FieldArray {
        let values = match self.cell_maps.get(&cell_type) {
            Some(map) => values.select_rows(map),
            None => values.clone(),
        };
        self.pad(values)
    }

    fn pad(&self, values: FieldArray) -> FieldArray {
        match self.space_dimension {
            Some(dim) => values.pad_components(self.base.space_dimension(), dim),
            None => values,
        }
    }
}

impl MeshGeometry for TransformedMesh {
    fn points(&self) -> Cow<'_, Points> {
        let base = self.base.points();
        let points = match &self.point_map {
            Some(map) => base.select(map),
            None => base.into_owned(),
        };
        Cow::Owned(match self.space_dimension {
            Some(dim) => points.extended_to(dim),
            None => points,
        })
    }

    fn cell_types(&self) -> Vec<CellType> {
        self.base.cell_types()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        let base = self.base.connectivity(cell_type)?;
        let block = match self.cell_maps.get(&cell_type) {
            Some(map) => base.select(map),
            None => base.into_owned(),
        };
        Some(Cow::Owned(match &self.inverse_point_map {
            Some(inverse) => block.map_corners(|p| inverse[p]),
            None => block,
        }))
    }

    fn tolerances(&self) -> MeshTolerances {
        self.tolerances.unwrap_or_else(|| self.base.tolerances())
    }

    fn num_points(&self) -> usize {
        self.point_map
            .as_ref()
            .map_or_else(|| self.base.num_points(), Vec::len)
    }

    fn space_dimension(&self) -> usize {
        self.space_dimension
            .unwrap_or_else(|| self.base.space_dimension())
    }

    fn num_cells(&self, cell_type: CellType) -> usize {
        self.base.num_cells(cell_type)
    }
}
