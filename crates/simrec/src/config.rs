//! Top-K neighbor search configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimilarityError};

/// Whether a row may appear among its own neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfMatch {
    /// Every row is a candidate, including the query row itself.
    ///
    /// A non-zero row is always its own best match.
    #[default]
    Include,
    /// The query row is removed from its own candidate list.
    Exclude,
}

/// What to do with rows whose L2 norm is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroNormPolicy {
    /// Keep the NaN or infinite scores; NaN ranks below every number.
    #[default]
    Propagate,
    /// Fail with [`SimilarityError::DegenerateVector`].
    Reject,
}

/// Configuration for the [top-K finder](crate::ops::TopKFinder).
///
/// # Parameters
///
/// * `k` - Number of neighbors kept per row.
///
/// * `cast` - Narrow the matrix to 16-bit storage and round norms to half
///   precision. Trades accuracy for memory on large matrices.
///
/// * `self_match` - Whether the query row counts as its own neighbor.
///
/// * `zero_norm` - How rows with zero norm are handled.
///
/// * `progress_interval` - Emit a debug progress event every this many rows.
///   Zero disables progress events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopKConfig {
    /// Number of neighbors per row.
    pub k: usize,
    /// Narrow before computing.
    pub cast: bool,
    /// Self-inclusion policy.
    pub self_match: SelfMatch,
    /// Zero-norm policy.
    pub zero_norm: ZeroNormPolicy,
    /// Rows between progress events.
    pub progress_interval: usize,
}

impl TopKConfig {
    /// Create a configuration keeping `k` neighbors per row.
    ///
    /// Other parameters are set to defaults:
    /// - `cast` = true
    /// - `self_match` = [`SelfMatch::Include`]
    /// - `zero_norm` = [`ZeroNormPolicy::Propagate`]
    /// - `progress_interval` = 10 000
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self {
            k,
            cast: true,
            self_match: SelfMatch::Include,
            zero_norm: ZeroNormPolicy::Propagate,
            progress_interval: 10_000,
        }
    }

    /// Set whether to narrow before computing.
    #[must_use]
    pub const fn with_cast(mut self, cast: bool) -> Self {
        self.cast = cast;
        self
    }

    /// Set the self-inclusion policy.
    #[must_use]
    pub const fn with_self_match(mut self, self_match: SelfMatch) -> Self {
        self.self_match = self_match;
        self
    }

    /// Set the zero-norm policy.
    #[must_use]
    pub const fn with_zero_norm(mut self, zero_norm: ZeroNormPolicy) -> Self {
        self.zero_norm = zero_norm;
        self
    }

    /// Set the number of rows between progress events.
    #[must_use]
    pub const fn with_progress_interval(mut self, rows: usize) -> Self {
        self.progress_interval = rows;
        self
    }

    /// Largest valid `k` for a matrix with `rows` rows.
    #[must_use]
    pub const fn max_k(&self, rows: usize) -> usize {
        match self.self_match {
            SelfMatch::Include => rows,
            SelfMatch::Exclude => rows.saturating_sub(1),
        }
    }

    /// Check `k` against a matrix with `rows` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SimilarityError::InvalidK`] if `k` is zero or exceeds the
    /// number of candidates per row.
    pub fn validate(&self, rows: usize) -> Result<()> {
        let max = self.max_k(rows);
        if self.k == 0 || self.k > max {
            Err(SimilarityError::InvalidK { k: self.k, max })
        } else {
            Ok(())
        }
    }
}

impl Default for TopKConfig {
    /// K=400 neighbors, narrowed, self included.
    fn default() -> Self {
        Self::new(400)
    }
}
