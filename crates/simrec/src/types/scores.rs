//! Result containers returned to callers.

use serde::Serialize;

/// A dense row-major matrix of similarity scores.
///
/// Entry `(i, j)` is the cosine similarity between row `i` and row `j` of the
/// source matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ScoreMatrix {
    pub(crate) fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(rows * cols, data.len());
        Self { rows, cols, data }
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Score at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row of scores.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// The diagonal (self-similarities).
    #[must_use]
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.data[i * self.cols + i]).collect()
    }

    /// The row-major scores.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// One ranked neighbor of a query row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Row index of the neighbor in the source matrix.
    pub index: u32,
    /// Cosine similarity to the query row.
    pub score: f64,
}

impl Neighbor {
    /// Create a new neighbor.
    #[must_use]
    pub const fn new(index: u32, score: f64) -> Self {
        Self { index, score }
    }
}

/// An N×K matrix of neighbor row indices.
///
/// Row `i` lists the K rows most similar to source row `i`, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborMatrix {
    rows: usize,
    k: usize,
    indices: Vec<u32>,
}

impl NeighborMatrix {
    pub(crate) fn new(rows: usize, k: usize, indices: Vec<u32>) -> Self {
        debug_assert_eq!(rows * k, indices.len());
        Self { rows, k, indices }
    }

    /// `(rows, k)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.k)
    }

    /// Number of neighbors per row.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Neighbors of one source row, best first.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u32] {
        &self.indices[row * self.k..(row + 1) * self.k]
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// The row-major indices.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_matrix_access() {
        let scores = ScoreMatrix::new(2, 2, vec![1.0, 0.5, 0.5, 1.0]);
        assert_eq!(scores.shape(), (2, 2));
        assert_eq!(scores.get(0, 1), Some(0.5));
        assert_eq!(scores.get(2, 0), None);
        assert_eq!(scores.row(1), &[0.5, 1.0]);
        assert_eq!(scores.diagonal(), vec![1.0, 1.0]);
        assert_eq!(scores.rows().count(), 2);
    }

    #[test]
    fn test_neighbor_matrix_rows() {
        let neighbors = NeighborMatrix::new(2, 2, vec![0, 1, 1, 0]);
        assert_eq!(neighbors.shape(), (2, 2));
        assert_eq!(neighbors.row(1), &[1, 0]);
        assert_eq!(neighbors.rows().collect::<Vec<_>>(), vec![&[0, 1][..], &[1, 0][..]]);
    }

    #[test]
    fn test_neighbor_matrix_serializes() {
        let neighbors = NeighborMatrix::new(1, 1, vec![0]);
        let json = serde_json::to_string(&neighbors).unwrap();
        assert_eq!(json, r#"{"rows":1,"k":1,"indices":[0]}"#);
    }
}
