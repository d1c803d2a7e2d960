//! Structured grids: meshes whose connectivity follows from their extents.
//!
//! Extents count cells per axis and always have three entries; unused axes
//! have extent zero. Points are numbered with the x index running fastest,
//! then y, then z, and cells follow the same order.

use std::borrow::Cow;

use super::equality::{compare_arrays, mesh_equal};
use super::{MeshGeometry, MeshTolerances};
use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;
use crate::data::tolerance::DEFAULT_BASE_TOLERANCE;
use crate::predicates::PredicateResult;
use crate::topology::cell_type::CellType;
use crate::topology::cells::CellBlock;
use crate::topology::points::Points;

/// Number of cells along each axis.
pub type Extents = [usize; 3];

/// Number of grid points of a structured grid with the given extents.
pub fn num_grid_points(extents: &Extents) -> usize {
    extents.iter().map(|e| e + 1).product()
}

/// Number of axes with at least one cell.
pub fn grid_dimension(extents: &Extents) -> usize {
    extents.iter().filter(|&&e| e > 0).count()
}

/// The single cell type of a structured grid, `None` if it has no cells.
pub fn grid_cell_type(extents: &Extents) -> Option<CellType> {
    match grid_dimension(extents) {
        1 => Some(CellType::Line),
        2 => Some(CellType::Quad),
        3 => Some(CellType::Hexahedron),
        _ => None,
    }
}

/// Connectivity implied by the extents.
pub fn grid_connectivity(extents: &Extents) -> CellBlock {
    let active: Vec<usize> = extents.iter().copied().filter(|&e| e > 0).collect();
    let mut block = CellBlock::new();
    match active.as_slice() {
        [nx] => {
            for i in 0..*nx {
                block.push(&[i, i + 1]);
            }
        }
        [nx, ny] => {
            let x = nx + 1;
            for j in 0..*ny {
                for i in 0..*nx {
                    let p0 = j * x + i;
                    block.push(&[p0, p0 + 1, p0 + x + 1, p0 + x]);
                }
            }
        }
        [nx, ny, nz] => {
            let x = nx + 1;
            let xy = x * (ny + 1);
            for k in 0..*nz {
                for j in 0..*ny {
                    for i in 0..*nx {
                        let p0 = k * xy + j * x + i;
                        let quad = [p0, p0 + 1, p0 + x + 1, p0 + x];
                        let mut hex = quad.to_vec();
                        hex.extend(quad.iter().map(|p| p + xy));
                        block.push(&hex);
                    }
                }
            }
        }
        _ => {}
    }
    block
}

fn grid_connectivity_of(extents: &Extents, cell_type: CellType) -> Option<Cow<'static, CellBlock>> {
    (grid_cell_type(extents) == Some(cell_type)).then(|| Cow::Owned(grid_connectivity(extents)))
}

fn structured_tolerances(max_abs_coordinate: f64) -> MeshTolerances {
    MeshTolerances {
        absolute: max_abs_coordinate * DEFAULT_BASE_TOLERANCE,
        relative: DEFAULT_BASE_TOLERANCE,
    }
}

fn extents_mismatch(a: &Extents, b: &Extents) -> Option<PredicateResult> {
    (a != b).then(|| {
        PredicateResult::fail(format!(
            "Different structured grid extents: {a:?} vs. {b:?}"
        ))
    })
}

/// A structured grid with explicitly given point coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredMesh {
    extents: Extents,
    points: Points,
    tolerances: MeshTolerances,
}

impl StructuredMesh {
    pub fn new(extents: Extents, points: Points) -> Result<Self, FieldCompareError> {
        let expected = num_grid_points(&extents);
        if points.len() != expected {
            return Err(FieldCompareError::InvalidStructuredGrid(format!(
                "extents {extents:?} require {expected} points, got {}",
                points.len()
            )));
        }
        let tolerances = structured_tolerances(points.max_abs_coordinate());
        Ok(StructuredMesh {
            extents,
            points,
            tolerances,
        })
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    pub fn default_tolerances(&self) -> MeshTolerances {
        structured_tolerances(self.points.max_abs_coordinate())
    }

    pub(crate) fn set_resolved_tolerances(&mut self, tolerances: MeshTolerances) {
        self.tolerances = tolerances;
    }
}

impl MeshGeometry for StructuredMesh {
    fn points(&self) -> Cow<'_, Points> {
        Cow::Borrowed(&self.points)
    }

    fn cell_types(&self) -> Vec<CellType> {
        grid_cell_type(&self.extents).into_iter().collect()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        grid_connectivity_of(&self.extents, cell_type)
    }

    fn tolerances(&self) -> MeshTolerances {
        self.tolerances
    }
}

/// A structured grid spanned by per-axis ordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearMesh {
    ordinates: [Vec<f64>; 3],
    tolerances: MeshTolerances,
}

impl RectilinearMesh {
    /// Create from the ordinates of up to three axes; missing axes get the
    /// single ordinate 0.
    pub fn new(ordinates: Vec<Vec<f64>>) -> Result<Self, FieldCompareError> {
        if ordinates.is_empty() || ordinates.len() > 3 {
            return Err(FieldCompareError::InvalidStructuredGrid(format!(
                "expected ordinates for 1 to 3 axes, got {}",
                ordinates.len()
            )));
        }
        if let Some(axis) = ordinates.iter().position(Vec::is_empty) {
            return Err(FieldCompareError::InvalidStructuredGrid(format!(
                "no ordinates given for axis {axis}"
            )));
        }
        let mut axes = ordinates.into_iter();
        let mut next = || axes.next().unwrap_or_else(|| vec![0.0]);
        let ordinates = [next(), next(), next()];
        let max = ordinates
            .iter()
            .flatten()
            .fold(0.0f64, |acc, x| acc.max(x.abs()));
        Ok(RectilinearMesh {
            ordinates,
            tolerances: structured_tolerances(max),
        })
    }

    pub fn extents(&self) -> Extents {
        [
            self.ordinates[0].len() - 1,
            self.ordinates[1].len() - 1,
            self.ordinates[2].len() - 1,
        ]
    }

    pub fn ordinates(&self, axis: usize) -> &[f64] {
        &self.ordinates[axis]
    }

    pub fn default_tolerances(&self) -> MeshTolerances {
        let max = self
            .ordinates
            .iter()
            .flatten()
            .fold(0.0f64, |acc, x| acc.max(x.abs()));
        structured_tolerances(max)
    }

    pub(crate) fn set_resolved_tolerances(&mut self, tolerances: MeshTolerances) {
        self.tolerances = tolerances;
    }

    /// Compare extents, then the ordinates of each axis.
    pub fn equals(&self, other: &RectilinearMesh) -> PredicateResult {
        if let Some(mismatch) = extents_mismatch(&self.extents(), &other.extents()) {
            return mismatch;
        }
        let tol = self.tolerances.min(other.tolerances);
        for axis in 0..3 {
            let res = compare_arrays(
                &FieldArray::from(self.ordinates[axis].clone()),
                &FieldArray::from(other.ordinates[axis].clone()),
                tol,
            );
            if !res.value {
                return PredicateResult::fail(format!(
                    "Differing ordinates in direction {axis} - '{}'",
                    res.report
                ));
            }
        }
        PredicateResult::pass("Rectilinear grids compare equal")
    }
}

impl MeshGeometry for RectilinearMesh {
    fn points(&self) -> Cow<'_, Points> {
        let [xs, ys, zs] = &self.ordinates;
        let rows = zs
            .iter()
            .flat_map(|&z| ys.iter().flat_map(move |&y| xs.iter().map(move |&x| [x, y, z])))
            .collect();
        Cow::Owned(Points::from_rows(rows))
    }

    fn cell_types(&self) -> Vec<CellType> {
        grid_cell_type(&self.extents()).into_iter().collect()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        grid_connectivity_of(&self.extents(), cell_type)
    }

    fn tolerances(&self) -> MeshTolerances {
        self.tolerances
    }

    fn num_points(&self) -> usize {
        num_grid_points(&self.extents())
    }

    fn space_dimension(&self) -> usize {
        3
    }
}

/// A structured grid of equidistant points along (possibly rotated) axes.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageMesh {
    extents: Extents,
    origin: [f64; 3],
    spacing: [f64; 3],
    basis: [[f64; 3]; 3],
    tolerances: MeshTolerances,
}

impl ImageMesh {
    /// An axis-aligned image grid.
    pub fn new(extents: Extents, origin: [f64; 3], spacing: [f64; 3]) -> Self {
        let mut mesh = ImageMesh {
            extents,
            origin,
            spacing,
            basis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            tolerances: structured_tolerances(0.0),
        };
        mesh.tolerances = mesh.default_tolerances();
        mesh
    }

    /// Use the rows of `basis` as axis directions.
    pub fn with_basis(mut self, basis: [[f64; 3]; 3]) -> Self {
        self.basis = basis;
        self.tolerances = self.default_tolerances();
        self
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn basis(&self) -> [[f64; 3]; 3] {
        self.basis
    }

    fn point_at(&self, index: [usize; 3]) -> [f64; 3] {
        let mut p = self.origin;
        for (axis, &i) in index.iter().enumerate() {
            let step = self.spacing[axis] * i as f64;
            for (c, b) in p.iter_mut().zip(&self.basis[axis]) {
                *c += step * b;
            }
        }
        p
    }

    /// Coordinates are affine in the grid index, so the largest magnitude
    /// is attained at one of the box corners.
    pub fn default_tolerances(&self) -> MeshTolerances {
        let [ex, ey, ez] = self.extents;
        let mut max = 0.0f64;
        for i in [0, ex] {
            for j in [0, ey] {
                for k in [0, ez] {
                    max = self.point_at([i, j, k]).iter().fold(max, |m, c| m.max(c.abs()));
                }
            }
        }
        structured_tolerances(max)
    }

    pub(crate) fn set_resolved_tolerances(&mut self, tolerances: MeshTolerances) {
        self.tolerances = tolerances;
    }

    /// Compare extents, then origin, spacing and axis directions.
    pub fn equals(&self, other: &ImageMesh) -> PredicateResult {
        if let Some(mismatch) = extents_mismatch(&self.extents, &other.extents) {
            return mismatch;
        }
        let tol = self.tolerances.min(other.tolerances);
        let checks = [
            ("origin", self.origin.to_vec(), other.origin.to_vec()),
            ("spacing", self.spacing.to_vec(), other.spacing.to_vec()),
            (
                "basis",
                self.basis.iter().flatten().copied().collect(),
                other.basis.iter().flatten().copied().collect(),
            ),
        ];
        for (what, a, b) in checks {
            let res = compare_arrays(&FieldArray::from(a), &FieldArray::from(b), tol);
            if !res.value {
                return PredicateResult::fail(format!("Differing {what} - '{}'", res.report));
            }
        }
        PredicateResult::pass("Image grids compare equal")
    }
}

impl MeshGeometry for ImageMesh {
    fn points(&self) -> Cow<'_, Points> {
        let [ex, ey, ez] = self.extents;
        let mut rows = Vec::with_capacity(num_grid_points(&self.extents));
        for k in 0..=ez {
            for j in 0..=ey {
                for i in 0..=ex {
                    rows.push(self.point_at([i, j, k]));
                }
            }
        }
        Cow::Owned(Points::from_rows(rows))
    }

    fn cell_types(&self) -> Vec<CellType> {
        grid_cell_type(&self.extents).into_iter().collect()
    }

    fn connectivity(&self, cell_type: CellType) -> Option<Cow<'_, CellBlock>> {
        grid_connectivity_of(&self.extents, cell_type)
    }

    fn tolerances(&self) -> MeshTolerances {
        self.tolerances
    }

    fn num_points(&self) -> usize {
        num_grid_points(&self.extents)
    }

    fn space_dimension(&self) -> usize {
        3
    }
}

/// Equality of two structured grids of any kind: extents first, then
/// geometry.
pub(crate) fn structured_equal(
    a: &dyn MeshGeometry,
    a_extents: Extents,
    b: &dyn MeshGeometry,
    b_extents: Extents,
) -> PredicateResult {
    extents_mismatch(&a_extents, &b_extents).unwrap_or_else(|| mesh_equal(a, b, None, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_connectivity() {
        let block = grid_connectivity(&[2, 1, 0]);
        assert_eq!(block.len(), 2);
        assert_eq!(block.cell(0), &[0, 1, 4, 3]);
        assert_eq!(block.cell(1), &[1, 2, 5, 4]);
    }

    #[test]
    fn hexahedron_connectivity() {
        let block = grid_connectivity(&[1, 1, 1]);
        assert_eq!(block.cell(0), &[0, 1, 3, 2, 4, 5, 7, 6]);
        assert_eq!(grid_cell_type(&[1, 1, 1]), Some(CellType::Hexahedron));
        assert_eq!(grid_cell_type(&[0, 3, 0]), Some(CellType::Line));
        assert_eq!(grid_cell_type(&[0, 0, 0]), None);
    }

    #[test]
    fn rectilinear_points_run_x_fastest() {
        let mesh = RectilinearMesh::new(vec![vec![0.0, 1.0, 3.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(mesh.extents(), [2, 1, 0]);
        let pts = mesh.points();
        assert_eq!(pts.len(), 6);
        assert_eq!(pts.point(4), &[1.0, 2.0, 0.0]);
        assert_eq!(mesh.cell_types(), vec![CellType::Quad]);
    }

    #[test]
    fn image_matches_equivalent_rectilinear_points() {
        let image = ImageMesh::new([2, 1, 0], [0.0, 0.0, 0.0], [0.5, 2.0, 1.0]);
        let rect = RectilinearMesh::new(vec![vec![0.0, 0.5, 1.0], vec![0.0, 2.0]]).unwrap();
        assert_eq!(image.points().as_ref(), rect.points().as_ref());
        assert!(structured_equal(&image, image.extents(), &rect, rect.extents()).value);
    }

    #[test]
    fn extents_are_checked_first() {
        let a = ImageMesh::new([2, 1, 0], [0.0; 3], [1.0; 3]);
        let b = ImageMesh::new([1, 2, 0], [0.0; 3], [1.0; 3]);
        let res = a.equals(&b);
        assert!(!res.value);
        assert!(res.report.starts_with("Different structured grid extents"));
    }

    #[test]
    fn structured_points_must_match_extents() {
        let pts = Points::from_rows(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert!(StructuredMesh::new([1, 1, 0], pts).is_err());
    }
}
