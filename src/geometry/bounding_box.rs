//! Axis-aligned bounding boxes of point sets.

use crate::topology::points::Points;

#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl BoundingBox {
    /// Bounding box of `points`, `None` if there are none.
    pub fn of(points: &Points) -> Option<Self> {
        let mut iter = points.iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            min: first.to_vec(),
            max: first.to_vec(),
        };
        for p in iter {
            for (axis, &c) in p.iter().enumerate() {
                bbox.min[axis] = bbox.min[axis].min(c);
                bbox.max[axis] = bbox.max[axis].max(c);
            }
        }
        Some(bbox)
    }

    pub fn extents(&self) -> Vec<f64> {
        self.max.iter().zip(&self.min).map(|(hi, lo)| hi - lo).collect()
    }

    pub fn diagonal(&self) -> f64 {
        self.extents().iter().map(|e| e * e).sum::<f64>().sqrt()
    }

    /// Largest extent over all axes.
    pub fn max_extent(&self) -> f64 {
        self.extents().into_iter().fold(0.0, f64::max)
    }
}
