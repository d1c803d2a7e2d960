//! Conversion of pixel and voxel cells into quads and hexahedra.

use std::collections::{BTreeMap, BTreeSet};

use super::merge::zeros_like;
use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::fields::MeshFields;
use crate::mesh::{Mesh, MeshGeometry, UnstructuredMesh};
use crate::topology::cell_type::CellType;
use crate::topology::cells::CellBlock;

/// Source cell types (ascending) contributing to each conforming type.
fn conforming_groups(mesh: &Mesh) -> BTreeMap<CellType, Vec<CellType>> {
    let mut groups: BTreeMap<CellType, Vec<CellType>> = BTreeMap::new();
    for ct in mesh.cell_types() {
        groups.entry(ct.conforming()).or_default().push(ct);
    }
    groups
}

/// An unstructured copy of `mesh` in which pixels are quads and voxels are
/// hexahedra, with their corners reordered accordingly. Cells converted
/// into a type the mesh already has are appended to that type's cells.
pub fn to_conforming_mesh(mesh: &Mesh) -> Result<UnstructuredMesh, FieldCompareError> {
    let cells = conforming_groups(mesh)
        .into_iter()
        .map(|(target, sources)| {
            let block = sources.iter().fold(CellBlock::new(), |acc, &ct| match mesh.connectivity(ct) {
                Some(block) => acc.concat(&block.map_cells(|c| ct.conforming_corners(c))),
                None => acc,
            });
            (target, block)
        })
        .collect::<Vec<_>>();
    let mut converted = UnstructuredMesh::new(mesh.points().into_owned(), cells)?;
    converted.set_resolved_tolerances(mesh.tolerances());
    Ok(converted)
}

/// Convert pixel and voxel cells of a mesh with fields. Cell fields follow
/// their cells; where only some of the merged cell types carry a field, the
/// others are zero-filled.
pub fn to_conforming_cell_types(fields: &MeshFields) -> Result<MeshFields, FieldCompareError> {
    let mesh = fields.domain();
    let mut converted = MeshFields::from_mesh(to_conforming_mesh(mesh)?)?;
    for field in fields.point_fields() {
        let name = field.name().to_string();
        converted = converted.with_point_field(name, field.into_values())?;
    }

    let names: BTreeSet<String> = fields
        .cell_fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    for (target, sources) in conforming_groups(mesh) {
        for name in &names {
            let parts: Vec<(CellType, Option<FieldArray>)> = sources
                .iter()
                .map(|&ct| (ct, fields.cell_field(name, ct).map(|f| f.into_values())))
                .collect();
            let Some(template) = parts.iter().find_map(|(_, v)| v.clone()) else {
                continue;
            };
            let mut values: Option<FieldArray> = None;
            for (ct, part) in parts {
                let part = part.unwrap_or_else(|| zeros_like(&template, mesh.num_cells(ct)));
                values = Some(match values {
                    Some(acc) => acc.concat_rows(&part)?,
                    None => part,
                });
            }
            if let Some(values) = values {
                converted = converted.with_cell_field(name.as_str(), target, values)?;
            }
        }
    }
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::points::Points;

    #[test]
    fn pixel_becomes_counter_clockwise_quad() {
        let points = Points::from_rows(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let mesh = Mesh::from(
            UnstructuredMesh::new(points, [(CellType::Pixel, CellBlock::from(vec![[0, 1, 2, 3]]))])
                .unwrap(),
        );
        let converted = to_conforming_mesh(&mesh).unwrap();
        assert_eq!(converted.cell_types(), vec![CellType::Quad]);
        assert_eq!(converted.connectivity(CellType::Quad).unwrap().cell(0), &[0, 1, 3, 2]);
    }
}
