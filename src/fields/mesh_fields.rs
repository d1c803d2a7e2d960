//! Point and cell fields defined on a mesh.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Domain, FieldData};
use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::data::field::{Field, FieldLocation};
use crate::mesh::{Mesh, MeshGeometry};
use crate::topology::cell_type::CellType;

#[derive(Clone, Debug, Default, PartialEq)]
struct FieldStore {
    point_data: BTreeMap<String, FieldArray>,
    cell_data: BTreeMap<String, BTreeMap<CellType, FieldArray>>,
}

/// A mesh together with the fields defined on it.
///
/// Field values are stored for the base mesh and shared between copies.
/// When the mesh is a transformed view, fields are mapped through the view
/// on access, so reordering a mesh never copies field data.
#[derive(Clone, Debug)]
pub struct MeshFields {
    mesh: Arc<Mesh>,
    data: Arc<FieldStore>,
}

static_assertions::assert_impl_all!(MeshFields: Send, Sync);

impl MeshFields {
    /// Mesh without fields. Views are turned into unstructured meshes so
    /// that fields added later index the mesh as it is seen.
    pub fn from_mesh(mesh: impl Into<Mesh>) -> Result<Self, FieldCompareError> {
        let mesh = match mesh.into() {
            Mesh::Transformed(view) => Mesh::from(Mesh::Transformed(view).to_unstructured()?),
            other => other,
        };
        Ok(MeshFields {
            mesh: Arc::new(mesh),
            data: Arc::default(),
        })
    }

    /// Add a field with one row per point.
    pub fn with_point_field(
        self,
        name: impl Into<String>,
        values: FieldArray,
    ) -> Result<Self, FieldCompareError> {
        let mut this = self.into_untransformed()?;
        let name = name.into();
        check_length(&name, this.mesh.num_points(), &values)?;
        Arc::make_mut(&mut this.data).point_data.insert(name, values);
        Ok(this)
    }

    /// Add a field with one row per cell of `cell_type`.
    pub fn with_cell_field(
        self,
        name: impl Into<String>,
        cell_type: CellType,
        values: FieldArray,
    ) -> Result<Self, FieldCompareError> {
        let mut this = self.into_untransformed()?;
        let name = name.into();
        if !this.mesh.cell_types().contains(&cell_type) {
            return Err(FieldCompareError::UnknownFieldCellType { name, cell_type });
        }
        check_length(&name, this.mesh.num_cells(cell_type), &values)?;
        Arc::make_mut(&mut this.data)
            .cell_data
            .entry(name)
            .or_default()
            .insert(cell_type, values);
        Ok(this)
    }

    /// Materialize a transformed mesh and its fields.
    fn into_untransformed(self) -> Result<Self, FieldCompareError> {
        if !matches!(self.mesh.as_ref(), Mesh::Transformed(_)) {
            return Ok(self);
        }
        let mut store = FieldStore::default();
        for field in self.point_fields() {
            store
                .point_data
                .insert(field.name().to_string(), field.into_values());
        }
        for field in self.cell_fields() {
            if let FieldLocation::Cell(ct) = field.location() {
                store
                    .cell_data
                    .entry(field.name().to_string())
                    .or_default()
                    .insert(ct, field.into_values());
            }
        }
        Ok(MeshFields {
            mesh: Arc::new(Mesh::from(self.mesh.to_unstructured()?)),
            data: Arc::new(store),
        })
    }

    pub fn domain(&self) -> &Mesh {
        &self.mesh
    }

    /// Shared handle to the mesh.
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Mutable access to the mesh, e.g. to adjust its tolerances. The mesh
    /// is copied first if it is shared.
    pub fn domain_mut(&mut self) -> &mut Mesh {
        Arc::make_mut(&mut self.mesh)
    }

    /// Same fields on a transformed version of the mesh.
    pub(crate) fn with_mesh(&self, mesh: Mesh) -> Self {
        MeshFields {
            mesh: Arc::new(mesh),
            data: Arc::clone(&self.data),
        }
    }

    pub fn point_field(&self, name: &str) -> Option<Field> {
        self.data.point_data.get(name).map(|values| {
            Field::new(
                name,
                FieldLocation::Point,
                self.mesh.transform_point_data(values),
            )
        })
    }

    pub fn cell_field(&self, name: &str, cell_type: CellType) -> Option<Field> {
        let values = self.data.cell_data.get(name)?.get(&cell_type)?;
        Some(Field::new(
            name,
            FieldLocation::Cell(cell_type),
            self.mesh.transform_cell_data(cell_type, values),
        ))
    }

    /// Point fields, ordered by name.
    pub fn point_fields(&self) -> Vec<Field> {
        self.data
            .point_data
            .keys()
            .filter_map(|name| self.point_field(name))
            .collect()
    }

    /// Cell fields, grouped by cell type (ascending id) and ordered by name.
    pub fn cell_fields(&self) -> Vec<Field> {
        self.mesh
            .cell_types()
            .into_iter()
            .flat_map(|ct| {
                self.data
                    .cell_data
                    .keys()
                    .filter_map(move |name| self.cell_field(name, ct))
            })
            .collect()
    }

    pub fn num_fields(&self) -> usize {
        self.data.point_data.len() + self.data.cell_data.values().map(BTreeMap::len).sum::<usize>()
    }
}

fn check_length(name: &str, expected: usize, values: &FieldArray) -> Result<(), FieldCompareError> {
    if values.ndim() == 0 || values.len() != expected {
        return Err(FieldCompareError::FieldLengthMismatch {
            name: name.to_string(),
            expected,
            found: if values.ndim() == 0 { 0 } else { values.len() },
        });
    }
    Ok(())
}

impl FieldData for MeshFields {
    fn domain(&self) -> Domain<'_> {
        Domain::Mesh(&self.mesh)
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields = self.point_fields();
        fields.extend(self.cell_fields());
        fields
    }
}
