//! Point coordinate storage.

use crate::compare_error::FieldCompareError;
use crate::data::array::FieldArray;

/// Coordinates of `len()` points in a `dimension()`-dimensional space,
/// stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Points {
    dimension: usize,
    coords: Vec<f64>,
}

impl Points {
    pub fn new(dimension: usize, coords: Vec<f64>) -> Result<Self, FieldCompareError> {
        if dimension == 0 && !coords.is_empty() {
            return Err(FieldCompareError::InvalidShape(
                "points need at least one coordinate".to_string(),
            ));
        }
        if dimension > 0 && coords.len() % dimension != 0 {
            return Err(FieldCompareError::InvalidShape(format!(
                "{} coordinates do not form points of dimension {dimension}",
                coords.len()
            )));
        }
        Ok(Points { dimension, coords })
    }

    pub fn from_rows<const D: usize>(rows: Vec<[f64; D]>) -> Self {
        Points {
            dimension: D,
            coords: rows.into_iter().flatten().collect(),
        }
    }

    /// Build from per-point coordinate lists of equal length.
    pub fn from_nested(rows: Vec<Vec<f64>>) -> Result<Self, FieldCompareError> {
        let dimension = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|r| r.len() != dimension) {
            return Err(FieldCompareError::PointDimensionMismatch {
                expected: dimension,
                found: row.len(),
            });
        }
        Points::new(dimension, rows.into_iter().flatten().collect())
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.coords.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.coords.chunks(self.dimension.max(1))
    }

    pub fn as_flat(&self) -> &[f64] {
        &self.coords
    }

    /// Gather points; `indices[i]` becomes point `i` of the result.
    pub fn select(&self, indices: &[usize]) -> Points {
        Points {
            dimension: self.dimension,
            coords: indices
                .iter()
                .flat_map(|&i| self.point(i).iter().copied())
                .collect(),
        }
    }

    /// Zero-pad the coordinates to `dimension` components.
    pub fn extended_to(&self, dimension: usize) -> Points {
        if dimension <= self.dimension {
            return self.clone();
        }
        let mut coords = Vec::with_capacity(self.len() * dimension);
        for p in self.iter() {
            coords.extend_from_slice(p);
            coords.resize(coords.len() + dimension - self.dimension, 0.0);
        }
        Points { dimension, coords }
    }

    /// Append the points of `other`, which must have the same dimension.
    pub fn concat(&self, other: &Points) -> Result<Points, FieldCompareError> {
        if self.dimension != other.dimension && !self.is_empty() && !other.is_empty() {
            return Err(FieldCompareError::PointDimensionMismatch {
                expected: self.dimension,
                found: other.dimension,
            });
        }
        let mut coords = self.coords.clone();
        coords.extend_from_slice(&other.coords);
        Ok(Points {
            dimension: self.dimension.max(other.dimension),
            coords,
        })
    }

    /// Largest absolute coordinate value (0 for no points).
    pub fn max_abs_coordinate(&self) -> f64 {
        self.coords.iter().fold(0.0, |acc, c| acc.max(c.abs()))
    }

    /// The coordinates as a `[len, dimension]` array.
    pub fn to_field_array(&self) -> FieldArray {
        let shape = vec![self.len(), self.dimension];
        FieldArray::new(shape, self.coords.clone().into())
            .unwrap_or_else(|_| FieldArray::from(Vec::<f64>::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_pads_with_zeros() {
        let pts = Points::from_rows(vec![[1.0, 2.0], [3.0, 4.0]]);
        let ext = pts.extended_to(3);
        assert_eq!(ext.dimension(), 3);
        assert_eq!(ext.point(1), &[3.0, 4.0, 0.0]);
    }

    #[test]
    fn rejects_incomplete_points() {
        assert!(Points::new(3, vec![0.0; 4]).is_err());
        assert!(Points::from_nested(vec![vec![0.0, 1.0], vec![0.0]]).is_err());
    }
}
