//! Geometric helpers: bounding boxes, cell centroids and tolerance-aware
//! ordering of coordinates.

pub mod bounding_box;
pub mod fuzzy;

pub use bounding_box::BoundingBox;
pub use fuzzy::{exact_lex_cmp, fuzzy_lex_sort, points_coincide};

use crate::data::tolerance::DEFAULT_BASE_TOLERANCE;
use crate::topology::points::Points;

/// Arithmetic mean of the given corner points.
pub fn centroid(points: &Points, corners: &[usize]) -> Vec<f64> {
    let mut c = vec![0.0; points.dimension()];
    for &corner in corners {
        for (acc, x) in c.iter_mut().zip(points.point(corner)) {
            *acc += x;
        }
    }
    if !corners.is_empty() {
        let n = corners.len() as f64;
        c.iter_mut().for_each(|x| *x /= n);
    }
    c
}

/// Tolerance for detecting coincident points: the largest bounding box
/// extent scaled by the base tolerance.
pub fn point_cloud_tolerance(points: &Points) -> f64 {
    BoundingBox::of(points).map_or(0.0, |b| b.max_extent() * DEFAULT_BASE_TOLERANCE)
}
