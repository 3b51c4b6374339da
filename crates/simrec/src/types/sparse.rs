//! Compressed-row sparse vectors and matrices.
//!
//! Only non-zero entries are stored, as `(column, value)` pairs sorted by
//! column in ascending order. Values keep their original [`NumericKind`] until
//! they are narrowed.

use std::ops::Range;

use crate::error::{check_dimension, Result, SimilarityError};
use crate::precision::{normalize, Element, NumericKind, Values};
use crate::types::DenseMatrix;

/// A sparse vector of fixed logical dimension.
///
/// # Example
///
/// ```
/// use simrec::types::SparseVector;
///
/// // Pairs may arrive unsorted; zeros are dropped.
/// let v = SparseVector::from_pairs(10, vec![(7, 2_i64), (1, 5), (3, 0)]).unwrap();
/// assert_eq!(v.indices(), &[1, 7]);
/// assert_eq!(v.nnz(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<u32>,
    values: Values,
}

impl SparseVector {
    /// Create a sparse vector from sorted indices and their values.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffers differ in length, indices are not
    /// strictly increasing, or an index is `>= dim`.
    pub fn new(dim: usize, indices: Vec<u32>, values: Values) -> Result<Self> {
        check_dimension(indices.len(), values.len())?;
        validate_indices(&indices, dim)?;
        Ok(Self { dim, indices, values })
    }

    /// Create a sparse vector from unsorted `(index, value)` pairs.
    ///
    /// Pairs are sorted by index and zero values are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate indices or indices `>= dim`.
    pub fn from_pairs<T: Element>(dim: usize, mut pairs: Vec<(u32, T)>) -> Result<Self> {
        pairs.retain(|&(_, v)| !v.is_zero());
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<u32>, Vec<T>) = pairs.into_iter().unzip();
        validate_indices(&indices, dim)?;
        Ok(Self { dim, indices, values: T::wrap(values) })
    }

    /// Create a sparse vector holding the non-zeros of a dense one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // column counts are bounded by u32 indices
    pub fn from_dense(dense: &Values) -> Self {
        let positions = dense.non_zero_positions();
        let values = dense.gather(&positions);
        let indices = positions.iter().map(|&p| p as u32).collect();
        Self { dim: dense.len(), indices, values }
    }

    /// Expand into a dense vector of the same kind.
    #[must_use]
    pub fn to_dense(&self) -> Values {
        let mut dense = Values::zeros(self.kind(), self.dim);
        let positions: Vec<usize> = self.indices.iter().map(|&i| i as usize).collect();
        let scattered = dense.scatter(&positions, &self.values);
        debug_assert!(scattered, "zeros share the stored kind");
        dense
    }

    /// Logical dimension.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Sorted column indices of the stored entries.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Stored values, aligned with [`indices`](Self::indices).
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        self.values.kind()
    }

    /// A copy narrowed to the canonical 16-bit kind.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::UnsupportedDtype`] for unsigned or boolean values.
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self { dim: self.dim, indices: self.indices.clone(), values: normalize(&self.values)? })
    }
}

/// A sparse N×D matrix in compressed-row (CSR) form.
///
/// Row `i` owns the stored entries `indptr[i]..indptr[i + 1]` of `indices` and
/// `values`.
///
/// # Example
///
/// ```
/// use simrec::types::SparseMatrix;
///
/// let m = SparseMatrix::from_triplets((2, 4), vec![(1, 3, 1.5_f32), (0, 0, 2.0)]).unwrap();
/// assert_eq!(m.nnz(), 2);
/// assert_eq!(m.row(1).unwrap().indices(), &[3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    values: Values,
}

impl SparseMatrix {
    /// Create a matrix from raw CSR buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if `indptr` does not have `rows + 1` non-decreasing
    /// offsets ending at `indices.len()`, if `indices` and `values` differ in
    /// length, or if any row has unsorted or out-of-range column indices.
    pub fn new(
        shape: (usize, usize),
        indptr: Vec<usize>,
        indices: Vec<u32>,
        values: Values,
    ) -> Result<Self> {
        let (rows, cols) = shape;
        check_dimension(indices.len(), values.len())?;

        if indptr.len() != rows + 1 {
            return Err(SimilarityError::InvalidSparse(format!(
                "indptr has {} offsets, expected {}",
                indptr.len(),
                rows + 1
            )));
        }
        if indptr[0] != 0 || indptr[rows] != indices.len() {
            return Err(SimilarityError::InvalidSparse(format!(
                "indptr must span 0..{}",
                indices.len()
            )));
        }
        for (row, window) in indptr.windows(2).enumerate() {
            if window[0] > window[1] {
                return Err(SimilarityError::InvalidSparse(format!(
                    "indptr decreases at row {row}"
                )));
            }
            validate_indices(&indices[window[0]..window[1]], cols)?;
        }

        Ok(Self { rows, cols, indptr, indices, values })
    }

    /// Create a matrix from `(row, column, value)` triplets in any order.
    ///
    /// Zero values are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range coordinates or duplicate coordinates.
    pub fn from_triplets<T: Element>(
        shape: (usize, usize),
        mut entries: Vec<(usize, u32, T)>,
    ) -> Result<Self> {
        let (rows, cols) = shape;
        entries.retain(|&(_, _, v)| !v.is_zero());
        entries.sort_by_key(|&(row, col, _)| (row, col));

        for window in entries.windows(2) {
            if (window[0].0, window[0].1) == (window[1].0, window[1].1) {
                return Err(SimilarityError::InvalidSparse(format!(
                    "duplicate coordinate ({}, {})",
                    window[0].0, window[0].1
                )));
            }
        }

        let mut indptr = vec![0; rows + 1];
        let mut indices = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (row, col, value) in entries {
            if row >= rows {
                return Err(SimilarityError::IndexOutOfBounds { index: row, max: rows });
            }
            if col as usize >= cols {
                return Err(SimilarityError::IndexOutOfBounds { index: col as usize, max: cols });
            }
            indptr[row + 1] += 1;
            indices.push(col);
            values.push(value);
        }
        for row in 0..rows {
            indptr[row + 1] += indptr[row];
        }

        Ok(Self { rows, cols, indptr, indices, values: T::wrap(values) })
    }

    /// Compress a dense matrix, keeping only its non-zero entries.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // column counts are bounded by u32 indices
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let (rows, cols) = dense.shape();
        let positions = dense.values().non_zero_positions();

        let mut indptr = vec![0; rows + 1];
        let mut indices = Vec::with_capacity(positions.len());
        for &p in &positions {
            indptr[p / cols + 1] += 1;
            indices.push((p % cols) as u32);
        }
        for row in 0..rows {
            indptr[row + 1] += indptr[row];
        }

        Self { rows, cols, indptr, indices, values: dense.values().gather(&positions) }
    }

    /// Expand into a dense matrix of the same kind.
    #[must_use]
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = Values::zeros(self.kind(), self.rows * self.cols);
        let positions: Vec<usize> = (0..self.rows)
            .flat_map(|row| {
                self.indices[self.row_span(row)].iter().map(move |&c| row * self.cols + c as usize)
            })
            .collect();
        let scattered = dense.scatter(&positions, &self.values);
        debug_assert!(scattered, "zeros share the stored kind");
        DenseMatrix::from_parts(self.rows, self.cols, dense)
    }

    /// Number of rows.
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn num_cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        self.values.kind()
    }

    /// Row offsets into [`indices`](Self::indices) and [`values`](Self::values).
    #[must_use]
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Column index of every stored entry.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Every stored value.
    #[must_use]
    pub const fn values(&self) -> &Values {
        &self.values
    }

    /// Copy one row out as a sparse vector.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::IndexOutOfBounds`] if `row >= num_rows()`.
    pub fn row(&self, row: usize) -> Result<SparseVector> {
        self.check_row(row)?;
        let span = self.row_span(row);
        Ok(SparseVector {
            dim: self.cols,
            indices: self.indices[span.clone()].to_vec(),
            values: self.values.slice(span),
        })
    }

    /// A copy narrowed to the canonical 16-bit kind.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::UnsupportedDtype`] for unsigned or boolean values.
    pub fn normalized(&self) -> Result<Self> {
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            values: normalize(&self.values)?,
        })
    }

    pub(crate) fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows {
            Ok(())
        } else {
            Err(SimilarityError::IndexOutOfBounds { index: row, max: self.rows })
        }
    }

    pub(crate) fn row_span(&self, row: usize) -> Range<usize> {
        self.indptr[row]..self.indptr[row + 1]
    }
}

fn validate_indices(indices: &[u32], dim: usize) -> Result<()> {
    for window in indices.windows(2) {
        if window[0] >= window[1] {
            return Err(SimilarityError::InvalidSparse(format!(
                "column indices not strictly increasing at {}",
                window[1]
            )));
        }
    }
    if let Some(&last) = indices.last() {
        if last as usize >= dim {
            return Err(SimilarityError::IndexOutOfBounds { index: last as usize, max: dim });
        }
    }
    Ok(())
}
