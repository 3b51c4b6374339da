//! Cosine similarity engines.
//!
//! This module provides the similarity kernels for every vector
//! representation:
//!
//! - [`dense`] - dense vectors and row-major matrices
//! - [`sparse`] - compressed-row sparse vectors and matrices
//! - [`compressed_cosine`] - key-to-value maps over open key universes
//!
//! The [`CosineSimilarity`] trait abstracts over the matrix representations so
//! that higher-level operations such as the
//! [top-K finder](crate::ops::TopKFinder) work with any of them.
//!
//! # Precision
//!
//! Operations taking a `cast` flag narrow their operands first (see
//! [`normalize`](crate::precision::normalize)) and round norms to half
//! precision following [`Arithmetic`](crate::precision::Arithmetic). With
//! `cast == false` everything runs in `f64`.
//!
//! # Zero vectors
//!
//! A zero-norm operand is not guarded: scores involving it are NaN (or
//! infinite). Callers that need an error instead can use
//! [`ZeroNormPolicy::Reject`](crate::config::ZeroNormPolicy::Reject) on the
//! top-K finder.

mod compressed;
pub mod dense;
mod scalar;
pub mod sparse;

pub use compressed::{compressed_cosine, compressed_cosine_against_collection};
pub use scalar::{cosine_similarity, dot_product, l2_norm, sparse_dot_product};

use crate::error::Result;
use crate::precision::{with_slice, NumericKind};
use crate::types::{DenseMatrix, Matrix, ScoreMatrix, SparseMatrix};

/// Row-wise cosine similarity over a matrix representation.
///
/// Implementors compute raw dot products and norms at the precision of their
/// stored values; rounding is left to the caller.
pub trait CosineSimilarity {
    /// `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    /// Element kind of the stored values.
    fn kind(&self) -> NumericKind;

    /// A copy narrowed to the canonical 16-bit kind.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::UnsupportedDtype`](crate::SimilarityError::UnsupportedDtype)
    /// for unsigned or boolean values.
    fn normalized(&self) -> Result<Self>
    where
        Self: Sized;

    /// L2 norm of every row.
    fn row_norms(&self) -> Vec<f64>;

    /// Dot product of one row against every row.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::IndexOutOfBounds`](crate::SimilarityError::IndexOutOfBounds)
    /// if `row` is not a row of this matrix.
    fn row_dots(&self, row: usize) -> Result<Vec<f64>>;

    /// Cosine similarity between every pair of rows.
    ///
    /// # Errors
    ///
    /// Returns an error if narrowing fails.
    fn all_pairs_cosine(&self, cast: bool) -> Result<ScoreMatrix>;

    /// Number of rows.
    fn num_rows(&self) -> usize {
        self.shape().0
    }
}

impl CosineSimilarity for DenseMatrix {
    fn shape(&self) -> (usize, usize) {
        DenseMatrix::shape(self)
    }

    fn kind(&self) -> NumericKind {
        DenseMatrix::kind(self)
    }

    fn normalized(&self) -> Result<Self> {
        DenseMatrix::normalized(self)
    }

    fn row_norms(&self) -> Vec<f64> {
        dense::row_norms(self)
    }

    fn row_dots(&self, row: usize) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let (rows, cols) = DenseMatrix::shape(self);
        let range = self.row_range(row);
        Ok(with_slice!(self.values(), |data| {
            dense::dots_against_rows(&data[range], data, rows, cols)
        }))
    }

    fn all_pairs_cosine(&self, cast: bool) -> Result<ScoreMatrix> {
        dense::all_pairs_cosine(self, cast)
    }
}

impl CosineSimilarity for SparseMatrix {
    fn shape(&self) -> (usize, usize) {
        SparseMatrix::shape(self)
    }

    fn kind(&self) -> NumericKind {
        SparseMatrix::kind(self)
    }

    fn normalized(&self) -> Result<Self> {
        SparseMatrix::normalized(self)
    }

    fn row_norms(&self) -> Vec<f64> {
        sparse::sparse_row_norms(self)
    }

    fn row_dots(&self, row: usize) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let span = self.row_span(row);
        Ok(with_slice!(self.values(), |data| {
            sparse::sparse_dots_against_rows(
                &self.indices()[span.clone()],
                &data[span],
                self,
                data,
            )
        }))
    }

    fn all_pairs_cosine(&self, cast: bool) -> Result<ScoreMatrix> {
        sparse::sparse_all_pairs_cosine(self, cast)
    }
}

impl CosineSimilarity for Matrix {
    fn shape(&self) -> (usize, usize) {
        Matrix::shape(self)
    }

    fn kind(&self) -> NumericKind {
        Matrix::kind(self)
    }

    fn normalized(&self) -> Result<Self> {
        Matrix::normalized(self)
    }

    fn row_norms(&self) -> Vec<f64> {
        match self {
            Self::Dense(m) => m.row_norms(),
            Self::Sparse(m) => m.row_norms(),
        }
    }

    fn row_dots(&self, row: usize) -> Result<Vec<f64>> {
        match self {
            Self::Dense(m) => m.row_dots(row),
            Self::Sparse(m) => m.row_dots(row),
        }
    }

    fn all_pairs_cosine(&self, cast: bool) -> Result<ScoreMatrix> {
        match self {
            Self::Dense(m) => m.all_pairs_cosine(cast),
            Self::Sparse(m) => m.all_pairs_cosine(cast),
        }
    }
}
