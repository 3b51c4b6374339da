//! Core types for the similarity engine.
//!
//! - [`DenseMatrix`] - A dense row-major matrix of entity vectors
//! - [`SparseMatrix`] - A compressed-row sparse matrix of entity vectors
//! - [`SparseVector`] - A single sparse vector (index, value pairs)
//! - [`Matrix`] - Either representation, chosen at construction time
//! - [`ScoreMatrix`] - Dense similarity scores returned by all-pairs operations
//! - [`NeighborMatrix`] - Top-K neighbor indices, one row per entity

mod dense;
mod matrix;
mod scores;
mod sparse;

pub(crate) use dense::rows_of;
pub use dense::DenseMatrix;
pub use matrix::{Layout, Matrix};
pub use scores::{Neighbor, NeighborMatrix, ScoreMatrix};
pub use sparse::{SparseMatrix, SparseVector};
