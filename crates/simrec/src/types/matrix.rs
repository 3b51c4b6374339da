//! The representation-tagged matrix.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::precision::NumericKind;
use crate::types::{DenseMatrix, SparseMatrix};

/// Storage layout of a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Every position materialized.
    Dense,
    /// Compressed-row storage of non-zeros.
    Sparse,
}

/// A matrix of entity vectors in either dense or sparse form.
///
/// The representation is fixed when the matrix is built; similarity
/// operations dispatch on the variant through
/// [`CosineSimilarity`](crate::similarity::CosineSimilarity).
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    /// Dense row-major storage.
    Dense(DenseMatrix),
    /// Compressed-row sparse storage.
    Sparse(SparseMatrix),
}

impl Matrix {
    /// The storage layout.
    #[must_use]
    pub const fn layout(&self) -> Layout {
        match self {
            Self::Dense(_) => Layout::Dense,
            Self::Sparse(_) => Layout::Sparse,
        }
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(m) => m.shape(),
            Self::Sparse(m) => m.shape(),
        }
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> NumericKind {
        match self {
            Self::Dense(m) => m.kind(),
            Self::Sparse(m) => m.kind(),
        }
    }

    /// Number of stored elements (all cells for dense, non-zeros for sparse).
    #[must_use]
    pub fn stored_len(&self) -> usize {
        match self {
            Self::Dense(m) => m.values().len(),
            Self::Sparse(m) => m.nnz(),
        }
    }

    /// Heap footprint of the stored values in bytes.
    ///
    /// Sparse index buffers are not included.
    #[must_use]
    pub fn value_bytes(&self) -> usize {
        match self {
            Self::Dense(m) => m.values().memory_bytes(),
            Self::Sparse(m) => m.values().memory_bytes(),
        }
    }

    /// A copy narrowed to the canonical 16-bit kind, in the same layout.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::UnsupportedDtype`](crate::SimilarityError::UnsupportedDtype)
    /// for unsigned or boolean values.
    pub fn normalized(&self) -> Result<Self> {
        Ok(match self {
            Self::Dense(m) => Self::Dense(m.normalized()?),
            Self::Sparse(m) => Self::Sparse(m.normalized()?),
        })
    }

    /// Convert to dense storage.
    #[must_use]
    pub fn into_dense(self) -> DenseMatrix {
        match self {
            Self::Dense(m) => m,
            Self::Sparse(m) => m.to_dense(),
        }
    }

    /// Convert to sparse storage.
    #[must_use]
    pub fn into_sparse(self) -> SparseMatrix {
        match self {
            Self::Dense(m) => SparseMatrix::from_dense(&m),
            Self::Sparse(m) => m,
        }
    }
}

impl From<DenseMatrix> for Matrix {
    fn from(matrix: DenseMatrix) -> Self {
        Self::Dense(matrix)
    }
}

impl From<SparseMatrix> for Matrix {
    fn from(matrix: SparseMatrix) -> Self {
        Self::Sparse(matrix)
    }
}
