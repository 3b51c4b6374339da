//! simrec
//!
//! This crate provides exact cosine similarity and top-K neighbor search over
//! entity vectors, the core of collaborative-filtering style recommendation.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **Precision narrowing**: cast numeric buffers to 16-bit storage before any
//!   arithmetic, keeping large user/item matrices within memory budgets
//! - **Dense and sparse engines**: cosine of a vector against a matrix and
//!   all-pairs cosine, over row-major or compressed-row storage
//! - **Compressed maps**: cosine between key-to-value maps whose key sets differ
//! - **Top-K neighbors**: the K most similar rows for every row, exact
//!
//! # Example
//!
//! ```
//! use simrec::ops::top_k_neighbors;
//! use simrec::similarity::CosineSimilarity;
//! use simrec::types::{DenseMatrix, Matrix};
//!
//! let matrix = Matrix::from(DenseMatrix::from_rows(vec![
//!     vec![1_i64, 2, 3, 5, 4],
//!     vec![1, 2, 3, 4, 5],
//!     vec![1, 3, 2, 4, 4],
//! ])?);
//!
//! // Narrowed to int16 / half-precision arithmetic.
//! let scores = matrix.all_pairs_cosine(true)?;
//! assert_eq!(scores.shape(), (3, 3));
//!
//! let neighbors = top_k_neighbors(&matrix, 2, true)?;
//! assert_eq!(neighbors.shape(), (3, 2));
//! # Ok::<(), simrec::SimilarityError>(())
//! ```
//!
//! # Modules
//!
//! - [`precision`] - Numeric kinds, typed buffers and narrowing
//! - [`types`] - Dense, sparse and tagged matrices; result containers
//! - [`similarity`] - Cosine similarity engines and the [`CosineSimilarity`] trait
//! - [`ops`] - Top-K neighbor search
//! - [`config`] - Top-K configuration
//! - [`error`] - Error types
//!
//! # Features
//!
//! - `parallel` - score top-K rows on the rayon thread pool

pub mod config;
pub mod error;
pub mod ops;
pub mod precision;
pub mod similarity;
pub mod types;


// Re-export commonly used types
pub use config::{SelfMatch, TopKConfig, ZeroNormPolicy};
pub use error::{Result, SimilarityError};
pub use ops::{top_k_neighbors, TopKFinder};
pub use precision::{normalize, NumericKind, Values};
pub use similarity::{compressed_cosine, compressed_cosine_against_collection, CosineSimilarity};
pub use types::{
    DenseMatrix, Layout, Matrix, Neighbor, NeighborMatrix, ScoreMatrix, SparseMatrix, SparseVector,
};
