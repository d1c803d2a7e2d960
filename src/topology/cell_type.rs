//! Cell type registry, numbered after the VTK cell type ids.

use crate::compare_error::FieldCompareError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Supported mesh cell types. The declaration order equals the order of
/// the VTK ids, so the derived `Ord` sorts by id.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// 0D vertex.
    Vertex,
    /// Set of vertices (variable size).
    PolyVertex,
    /// 1D segment.
    Line,
    /// Connected segments (variable size).
    PolyLine,
    /// 2D simplex.
    Triangle,
    /// 2D polygon (variable size).
    Polygon,
    /// Axis-aligned quadrilateral with lexicographic corner order.
    Pixel,
    /// 2D tensor-product cell with counter-clockwise corner order.
    Quad,
    /// 3D simplex.
    Tetra,
    /// Axis-aligned hexahedron with lexicographic corner order.
    Voxel,
    /// 3D tensor-product cell.
    Hexahedron,
    /// 3D prism.
    Wedge,
    /// 3D pyramid.
    Pyramid,
}

static NAME_TO_TYPE: Lazy<HashMap<&'static str, CellType>> =
    Lazy::new(|| CellType::ALL.iter().map(|&ct| (ct.name(), ct)).collect());

/// Corner permutation between voxel and hexahedron orderings (self-inverse).
const VOXEL_HEXAHEDRON_CORNERS: [usize; 8] = [0, 1, 3, 2, 4, 5, 7, 6];
/// Corner permutation between pixel and quad orderings (self-inverse).
const PIXEL_QUAD_CORNERS: [usize; 4] = [0, 1, 3, 2];

impl CellType {
    pub const ALL: [CellType; 13] = [
        CellType::Vertex,
        CellType::PolyVertex,
        CellType::Line,
        CellType::PolyLine,
        CellType::Triangle,
        CellType::Polygon,
        CellType::Pixel,
        CellType::Quad,
        CellType::Tetra,
        CellType::Voxel,
        CellType::Hexahedron,
        CellType::Wedge,
        CellType::Pyramid,
    ];

    /// The VTK id of this cell type.
    pub fn id(self) -> u8 {
        match self {
            CellType::Vertex => 1,
            CellType::PolyVertex => 2,
            CellType::Line => 3,
            CellType::PolyLine => 4,
            CellType::Triangle => 5,
            CellType::Polygon => 7,
            CellType::Pixel => 8,
            CellType::Quad => 9,
            CellType::Tetra => 10,
            CellType::Voxel => 11,
            CellType::Hexahedron => 12,
            CellType::Wedge => 13,
            CellType::Pyramid => 14,
        }
    }

    pub fn from_id(id: u8) -> Result<Self, FieldCompareError> {
        CellType::ALL
            .into_iter()
            .find(|ct| ct.id() == id)
            .ok_or(FieldCompareError::UnknownCellTypeId(id))
    }

    pub fn name(self) -> &'static str {
        match self {
            CellType::Vertex => "vertex",
            CellType::PolyVertex => "poly_vertex",
            CellType::Line => "line",
            CellType::PolyLine => "poly_line",
            CellType::Triangle => "triangle",
            CellType::Polygon => "polygon",
            CellType::Pixel => "pixel",
            CellType::Quad => "quad",
            CellType::Tetra => "tetra",
            CellType::Voxel => "voxel",
            CellType::Hexahedron => "hexahedron",
            CellType::Wedge => "wedge",
            CellType::Pyramid => "pyramid",
        }
    }

    /// Look up a cell type by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Result<Self, FieldCompareError> {
        NAME_TO_TYPE
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| FieldCompareError::UnknownCellTypeName(name.to_string()))
    }

    /// Number of corners, `None` for variable-size types.
    pub fn num_corners(self) -> Option<usize> {
        match self {
            CellType::Vertex => Some(1),
            CellType::Line => Some(2),
            CellType::Triangle => Some(3),
            CellType::Pixel | CellType::Quad | CellType::Tetra => Some(4),
            CellType::Pyramid => Some(5),
            CellType::Wedge => Some(6),
            CellType::Voxel | CellType::Hexahedron => Some(8),
            CellType::PolyVertex | CellType::PolyLine | CellType::Polygon => None,
        }
    }

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex | CellType::PolyVertex => 0,
            CellType::Line | CellType::PolyLine => 1,
            CellType::Triangle | CellType::Polygon | CellType::Pixel | CellType::Quad => 2,
            CellType::Tetra
            | CellType::Voxel
            | CellType::Hexahedron
            | CellType::Wedge
            | CellType::Pyramid => 3,
        }
    }

    /// The general cell type describing the same shape: pixels are quads
    /// and voxels are hexahedra with a different corner order.
    pub fn conforming(self) -> CellType {
        match self {
            CellType::Pixel => CellType::Quad,
            CellType::Voxel => CellType::Hexahedron,
            other => other,
        }
    }

    /// Whether both types describe the same shape up to corner ordering.
    pub fn is_compatible_with(self, other: CellType) -> bool {
        self.conforming() == other.conforming()
    }

    /// Reorder the corners of a cell of this type into the corner order of
    /// its [`conforming`](Self::conforming) type.
    pub fn conforming_corners(self, corners: &[usize]) -> Vec<usize> {
        let permutation: &[usize] = match self {
            CellType::Pixel => &PIXEL_QUAD_CORNERS,
            CellType::Voxel => &VOXEL_HEXAHEDRON_CORNERS,
            _ => return corners.to_vec(),
        };
        if corners.len() != permutation.len() {
            return corners.to_vec();
        }
        permutation.iter().map(|&i| corners[i]).collect()
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
