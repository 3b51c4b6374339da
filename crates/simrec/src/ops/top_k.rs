//! Exact top-K neighbor search.
//!
//! Brute force: every row is scored against every row, one row at a time, so
//! peak memory stays at O(N) scores instead of the full N×N similarity matrix.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{SelfMatch, TopKConfig, ZeroNormPolicy};
use crate::error::{Result, SimilarityError};
use crate::precision::Arithmetic;
use crate::similarity::CosineSimilarity;
use crate::types::{Neighbor, NeighborMatrix};

/// Top-K neighbor finder over any [`CosineSimilarity`] matrix.
///
/// Row norms are computed once when the finder is built and reused for every
/// row. Scores are identical to
/// [`cosine_against_matrix`](crate::similarity::dense::cosine_against_matrix)
/// of the same row.
///
/// # Ranking
///
/// Neighbors are ordered by descending score. NaN scores (zero-norm rows) rank
/// below every number, and equal scores are ordered by ascending row index.
///
/// This differs from reversing an ascending `argsort`, which sorts NaN last
/// and so would place zero-norm rows ahead of every real neighbor. Ranking NaN
/// last is intentional.
///
/// # Complexity
///
/// O(N² · D) time for a dense N×D matrix, O(N) scores held per row.
///
/// # Example
///
/// ```
/// use simrec::config::{SelfMatch, TopKConfig};
/// use simrec::ops::TopKFinder;
/// use simrec::types::SparseMatrix;
///
/// let matrix = SparseMatrix::from_triplets(
///     (3, 3),
///     vec![(0, 0, 1.0_f32), (1, 0, 1.0), (2, 2, 1.0)],
/// )
/// .unwrap();
///
/// let config = TopKConfig::new(1).with_self_match(SelfMatch::Exclude);
/// let neighbors = TopKFinder::new(&matrix, config).unwrap().run().unwrap();
/// assert_eq!(neighbors.row(0), &[1]);
/// assert_eq!(neighbors.row(1), &[0]);
/// ```
pub struct TopKFinder<'a, M: CosineSimilarity + Clone + Sync> {
    matrix: Cow<'a, M>,
    config: TopKConfig,
    arithmetic: Arithmetic,
    norms: Vec<f64>,
}

/// Heap entry ordered so that the worst kept neighbor sits on top.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    index: u32,
    score: f64,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    /// `Greater` means worse: lower score, NaN, or higher index on a tie.
    fn cmp(&self, other: &Self) -> Ordering {
        let by_score = match (self.score.is_nan(), other.score.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => other.score.partial_cmp(&self.score).unwrap_or(Ordering::Equal),
        };
        by_score.then(self.index.cmp(&other.index))
    }
}

impl<'a, M: CosineSimilarity + Clone + Sync> TopKFinder<'a, M> {
    /// Create a finder over `matrix`.
    ///
    /// With `config.cast` the matrix is narrowed into a private copy; the
    /// input is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::InvalidK`] if `config.k` is out of range,
    /// [`SimilarityError::UnsupportedDtype`] if narrowing fails, and
    /// [`SimilarityError::DegenerateVector`] for a zero-norm row under
    /// [`ZeroNormPolicy::Reject`].
    pub fn new(matrix: &'a M, config: TopKConfig) -> Result<Self> {
        config.validate(matrix.num_rows())?;

        let matrix =
            if config.cast { Cow::Owned(matrix.normalized()?) } else { Cow::Borrowed(matrix) };
        let arithmetic = Arithmetic::for_kind(matrix.kind(), config.cast);
        let norms: Vec<f64> =
            matrix.row_norms().into_iter().map(|n| arithmetic.norm(n)).collect();

        let zero_rows = norms.iter().filter(|&&n| n == 0.0).count();
        if let Some(row) = norms.iter().position(|&n| n == 0.0) {
            match config.zero_norm {
                ZeroNormPolicy::Reject => return Err(SimilarityError::DegenerateVector { row }),
                ZeroNormPolicy::Propagate => {
                    warn!(zero_rows, first = row, "zero-norm rows will score NaN");
                }
            }
        }

        Ok(Self { matrix, config, arithmetic, norms })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &TopKConfig {
        &self.config
    }

    /// Cosine similarity of `row` against every row, self included.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::IndexOutOfBounds`] if `row` is out of range.
    pub fn scores(&self, row: usize) -> Result<Vec<f64>> {
        let dots = self.matrix.row_dots(row)?;
        let norm = self.norms[row];
        Ok(dots
            .into_iter()
            .zip(&self.norms)
            .map(|(dot, &other)| self.arithmetic.cosine(dot, norm, other))
            .collect())
    }

    /// The K best neighbors of `row`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::IndexOutOfBounds`] if `row` is out of range.
    pub fn neighbors_of(&self, row: usize) -> Result<Vec<Neighbor>> {
        let scores = self.scores(row)?;
        let skip = match self.config.self_match {
            SelfMatch::Include => None,
            SelfMatch::Exclude => Some(row),
        };
        Ok(select_top_k(&scores, self.config.k, skip))
    }

    /// Find the K best neighbors of every row.
    ///
    /// Row `i` of the result holds the neighbors of source row `i`.
    ///
    /// # Errors
    ///
    /// Propagates any error raised while scoring a row.
    pub fn run(&self) -> Result<NeighborMatrix> {
        let (rows, cols) = self.matrix.shape();
        let k = self.config.k;
        info!(
            rows,
            cols,
            k,
            cast = self.config.cast,
            self_match = ?self.config.self_match,
            "finding top-k neighbors"
        );

        #[cfg(feature = "parallel")]
        let ranked: Vec<Vec<Neighbor>> =
            (0..rows).into_par_iter().map(|row| self.ranked_row(row)).collect::<Result<_>>()?;

        #[cfg(not(feature = "parallel"))]
        let ranked: Vec<Vec<Neighbor>> =
            (0..rows).map(|row| self.ranked_row(row)).collect::<Result<_>>()?;

        let indices = ranked.into_iter().flatten().map(|n| n.index).collect();

        info!(rows, k, "top-k search complete");
        Ok(NeighborMatrix::new(rows, k, indices))
    }

    fn ranked_row(&self, row: usize) -> Result<Vec<Neighbor>> {
        let neighbors = self.neighbors_of(row)?;
        let interval = self.config.progress_interval;
        if interval > 0 && (row + 1) % interval == 0 {
            debug!(done = row + 1, rows = self.norms.len(), "top-k progress");
        }
        Ok(neighbors)
    }
}

/// Find the top-K neighbors of every row of `matrix`.
///
/// Uses the default policies of [`TopKConfig`]: the query row is its own
/// candidate and zero-norm rows score NaN.
///
/// # Errors
///
/// Returns [`SimilarityError::InvalidK`] if `k` is zero or larger than the
/// row count, or any narrowing error when `cast` is set.
///
/// # Example
///
/// ```
/// use simrec::ops::top_k_neighbors;
/// use simrec::types::DenseMatrix;
///
/// let matrix = DenseMatrix::from_rows(vec![
///     vec![1_i64, 0, 0],
///     vec![2, 0, 0],
///     vec![0, 0, 5],
/// ])
/// .unwrap();
///
/// let neighbors = top_k_neighbors(&matrix, 2, true).unwrap();
/// assert_eq!(neighbors.shape(), (3, 2));
/// assert_eq!(neighbors.row(0), &[0, 1]);
/// ```
pub fn top_k_neighbors<M: CosineSimilarity + Clone + Sync>(
    matrix: &M,
    k: usize,
    cast: bool,
) -> Result<NeighborMatrix> {
    TopKFinder::new(matrix, TopKConfig::new(k).with_cast(cast))?.run()
}

/// Select the `k` best-ranked scores with a bounded max-heap.
#[allow(clippy::cast_possible_truncation)] // row indices are stored as u32
fn select_top_k(scores: &[f64], k: usize, skip: Option<usize>) -> Vec<Neighbor> {
    let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(k.saturating_add(1));

    for (index, &score) in scores.iter().enumerate() {
        if skip == Some(index) {
            continue;
        }
        let candidate = Ranked { index: index as u32, score };

        if heap.len() < k {
            heap.push(candidate);
        } else if let Some(worst) = heap.peek() {
            if candidate < *worst {
                heap.pop();
                heap.push(candidate);
            }
        }
    }

    heap.into_sorted_vec().into_iter().map(|r| Neighbor::new(r.index, r.score)).collect()
}
