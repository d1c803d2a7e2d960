//! Connectivity storage for blocks of cells of one type.

use std::collections::BTreeMap;

use crate::topology::cell_type::CellType;

/// Connectivity of all cells of one type, in compressed (offsets + corners)
/// form so that variable-size cell types fit the same layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellBlock {
    offsets: Vec<usize>,
    corners: Vec<usize>,
}

/// Connectivity per cell type, ordered by cell type id.
pub type Connectivity = BTreeMap<CellType, CellBlock>;

impl Default for CellBlock {
    fn default() -> Self {
        CellBlock {
            offsets: vec![0],
            corners: Vec::new(),
        }
    }
}

impl CellBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[usize]>,
    {
        let mut block = CellBlock::new();
        for cell in cells {
            block.push(cell.as_ref());
        }
        block
    }

    pub fn push(&mut self, corners: &[usize]) {
        self.corners.extend_from_slice(corners);
        self.offsets.push(self.corners.len());
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Corner indices of cell `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn cell(&self, i: usize) -> &[usize] {
        &self.corners[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.offsets.windows(2).map(|w| &self.corners[w[0]..w[1]])
    }

    /// All corner indices of all cells, concatenated.
    pub fn corners(&self) -> &[usize] {
        &self.corners
    }

    /// Gather cells; `rows[i]` becomes cell `i` of the result.
    pub fn select(&self, rows: &[usize]) -> CellBlock {
        CellBlock::from_cells(rows.iter().map(|&r| self.cell(r)))
    }

    /// Apply `f` to every corner index.
    pub fn map_corners(&self, f: impl Fn(usize) -> usize) -> CellBlock {
        CellBlock {
            offsets: self.offsets.clone(),
            corners: self.corners.iter().map(|&c| f(c)).collect(),
        }
    }

    /// Apply `f` to the corner list of every cell.
    pub fn map_cells(&self, f: impl Fn(&[usize]) -> Vec<usize>) -> CellBlock {
        CellBlock::from_cells(self.iter().map(f))
    }

    /// Append the cells of `other`.
    pub fn concat(&self, other: &CellBlock) -> CellBlock {
        let mut block = self.clone();
        for cell in other.iter() {
            block.push(cell);
        }
        block
    }

    /// Corner lists sorted ascending, used to compare cells irrespective of
    /// corner order.
    pub fn sorted_cell(&self, i: usize) -> Vec<usize> {
        let mut corners = self.cell(i).to_vec();
        corners.sort_unstable();
        corners
    }
}

impl<const K: usize> From<Vec<[usize; K]>> for CellBlock {
    fn from(cells: Vec<[usize; K]>) -> Self {
        CellBlock::from_cells(cells)
    }
}

impl From<Vec<Vec<usize>>> for CellBlock {
    fn from(cells: Vec<Vec<usize>>) -> Self {
        CellBlock::from_cells(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_size_cells() {
        let block = CellBlock::from(vec![vec![0, 1, 2], vec![3, 4, 5, 6]]);
        assert_eq!(block.len(), 2);
        assert_eq!(block.cell(1), &[3, 4, 5, 6]);
        let sel = block.select(&[1, 0, 1]);
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.iter().map(<[usize]>::len).collect::<Vec<_>>(), vec![4, 3, 4]);
        assert!(CellBlock::new().is_empty());
    }
}
