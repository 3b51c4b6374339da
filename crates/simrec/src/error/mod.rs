//! Error types for the similarity engine.

use thiserror::Error;

use crate::precision::NumericKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors that can occur in similarity operations.
#[derive(Debug, Error)]
pub enum SimilarityError {
    /// The numeric kind belongs to neither the signed-integer nor the float family.
    #[error("{kind} not supported: only signed integer and float values can be narrowed")]
    UnsupportedDtype {
        /// The rejected kind.
        kind: NumericKind,
    },

    /// Dimension mismatch between operands.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// A row with zero L2 norm was rejected.
    ///
    /// Only raised when the caller opted into [`ZeroNormPolicy::Reject`];
    /// by default zero norms propagate as NaN or infinite scores.
    ///
    /// [`ZeroNormPolicy::Reject`]: crate::config::ZeroNormPolicy::Reject
    #[error("row {row} has zero norm, cosine similarity is undefined")]
    DegenerateVector {
        /// The offending row.
        row: usize,
    },

    /// The neighbor count is zero or larger than the candidate count.
    #[error("invalid k: {k} (must be between 1 and {max})")]
    InvalidK {
        /// The requested neighbor count.
        k: usize,
        /// The largest valid neighbor count for this matrix.
        max: usize,
    },

    /// Index out of bounds.
    #[error("index out of bounds: {index} >= {max}")]
    IndexOutOfBounds {
        /// The index that was out of bounds.
        index: usize,
        /// The maximum valid index (exclusive).
        max: usize,
    },

    /// Malformed compressed-row buffers.
    #[error("invalid sparse structure: {0}")]
    InvalidSparse(String),
}

/// Check that `actual` equals `expected`.
pub(crate) fn check_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimilarityError::DimensionMismatch { expected, actual })
    }
}
