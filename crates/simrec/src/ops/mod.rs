//! Operations built on the similarity engines.
//!
//! # Operators
//!
//! - [`TopKFinder`] - exact brute-force top-K neighbors for every row
//! - [`top_k_neighbors`] - one-call form with default policies
//!
//! Rows are scored one at a time against the whole matrix, so peak memory is
//! O(N) per row rather than the O(N²) of a full similarity matrix. Use
//! [`CosineSimilarity::all_pairs_cosine`](crate::similarity::CosineSimilarity::all_pairs_cosine)
//! when the full matrix is wanted.
//!
//! With the `parallel` feature enabled, rows are scored on the rayon thread
//! pool. The output is identical to the sequential run.

mod top_k;

pub use top_k::{top_k_neighbors, TopKFinder};
