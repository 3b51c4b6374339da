//! Dense row-major matrices.

use std::ops::Range;

use crate::error::{check_dimension, Result, SimilarityError};
use crate::precision::{normalize, Element, NumericKind, Values};

/// A dense N×D matrix stored row-major in a single [`Values`] buffer.
///
/// Each row is the vector of one entity (a user or an item).
///
/// # Example
///
/// ```
/// use simrec::types::DenseMatrix;
///
/// let matrix = DenseMatrix::from_rows(vec![vec![1_i64, 2, 3], vec![4, 5, 6]]).unwrap();
/// assert_eq!(matrix.shape(), (2, 3));
/// assert_eq!(matrix.row(1).unwrap().to_f64_vec(), vec![4.0, 5.0, 6.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    values: Values,
}

impl DenseMatrix {
    /// Create a matrix from a row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::DimensionMismatch`] if the buffer length is not `rows * cols`.
    pub fn new(rows: usize, cols: usize, values: Values) -> Result<Self> {
        check_dimension(rows * cols, values.len())?;
        Ok(Self { rows, cols, values })
    }

    /// Create a matrix from equally sized rows.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::DimensionMismatch`] if the rows are ragged.
    pub fn from_rows<T: Element>(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let num_rows = rows.len();
        let mut data = Vec::with_capacity(num_rows * cols);

        for row in rows {
            check_dimension(cols, row.len())?;
            data.extend(row);
        }

        Ok(Self { rows: num_rows, cols, values: T::wrap(data) })
    }

    /// Number of rows (entities).
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (vector dimension).
    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element kind of the underlying buffer.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        self.values.kind()
    }

    /// The row-major buffer.
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    /// Copy one row out as a vector.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::IndexOutOfBounds`] if `row >= num_rows()`.
    pub fn row(&self, row: usize) -> Result<Values> {
        self.check_row(row)?;
        Ok(self.values.slice(self.row_range(row)))
    }

    /// A copy of this matrix narrowed to its canonical 16-bit kind.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::UnsupportedDtype`] for unsigned or boolean matrices.
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self { rows: self.rows, cols: self.cols, values: normalize(&self.values)? })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, values: Values) -> Self {
        debug_assert_eq!(rows * cols, values.len());
        Self { rows, cols, values }
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows {
            Ok(())
        } else {
            Err(SimilarityError::IndexOutOfBounds { index: row, max: self.rows })
        }
    }

    pub(crate) const fn row_range(&self, row: usize) -> Range<usize> {
        row * self.cols..(row + 1) * self.cols
    }
}

/// Iterate over the rows of a row-major slice.
///
/// Works for zero-width rows, unlike `chunks_exact`.
pub(crate) fn rows_of<T>(data: &[T], rows: usize, cols: usize) -> impl Iterator<Item = &[T]> {
    (0..rows).map(move |i| &data[i * cols..(i + 1) * cols])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let matrix = DenseMatrix::from_rows(vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.kind(), NumericKind::Float32);
        assert_eq!(matrix.row(0).unwrap(), Values::from(vec![1.0_f32, 2.0]));
    }

    #[test]
    fn test_ragged_rows() {
        let result = DenseMatrix::from_rows(vec![vec![1_i32, 2], vec![3]]);
        assert!(matches!(
            result,
            Err(SimilarityError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_new_checks_length() {
        let result = DenseMatrix::new(2, 3, Values::from(vec![1_i64; 5]));
        assert!(matches!(result, Err(SimilarityError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_row_out_of_bounds() {
        let matrix = DenseMatrix::from_rows(vec![vec![1_i64]]).unwrap();
        assert!(matches!(
            matrix.row(1),
            Err(SimilarityError::IndexOutOfBounds { index: 1, max: 1 })
        ));
    }

    #[test]
    fn test_normalized_keeps_shape() {
        let matrix = DenseMatrix::from_rows(vec![vec![1_i64, 2], vec![3, 4]]).unwrap();
        let narrowed = matrix.normalized().unwrap();
        assert_eq!(narrowed.shape(), (2, 2));
        assert_eq!(narrowed.kind(), NumericKind::Int16);
        assert_eq!(matrix.kind(), NumericKind::Int64);
    }

    #[test]
    fn test_empty() {
        let matrix = DenseMatrix::from_rows(Vec::<Vec<f64>>::new()).unwrap();
        assert_eq!(matrix.shape(), (0, 0));
    }

    #[test]
    fn test_rows_of_zero_width() {
        let data: [i32; 0] = [];
        assert_eq!(rows_of(&data, 3, 0).count(), 3);
    }
}
