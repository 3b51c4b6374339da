//! Rounding model for similarity arithmetic.

use half::f16;

use super::NumericKind;

/// How intermediate results of a cosine computation are rounded.
///
/// Accumulation always happens in `f64`. When the operands were narrowed, the
/// row norms are stored at half precision, and the final score is rounded
/// through `f16` when a float operand is involved. The norm product and the
/// quotient are computed in `f64`, so rows with large norms (anything past
/// `sqrt(65504)` ≈ 256) never overflow. A norm too large for `f16` itself is
/// kept at `f32` precision instead of becoming infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arithmetic {
    half_norms: bool,
    half_scores: bool,
}

impl Arithmetic {
    /// Full `f64` precision, no rounding.
    pub const NATIVE: Self = Self { half_norms: false, half_scores: false };

    /// Rounding for operands of the given kinds.
    ///
    /// Without `cast` the computation is always native.
    #[must_use]
    pub const fn for_operands(a: NumericKind, b: NumericKind, cast: bool) -> Self {
        if !cast {
            return Self::NATIVE;
        }
        Self { half_norms: true, half_scores: a.is_float() || b.is_float() }
    }

    /// Rounding for a matrix compared against itself.
    #[must_use]
    pub const fn for_kind(kind: NumericKind, cast: bool) -> Self {
        Self::for_operands(kind, kind, cast)
    }

    /// Whether any rounding happens.
    #[must_use]
    pub const fn is_native(self) -> bool {
        !self.half_norms && !self.half_scores
    }

    /// Round an L2 norm.
    #[inline]
    #[must_use]
    pub fn norm(self, norm: f64) -> f64 {
        if self.half_norms {
            round_norm(norm)
        } else {
            norm
        }
    }

    /// Cosine similarity from a raw dot product and two already-rounded norms.
    #[inline]
    #[must_use]
    pub fn cosine(self, dot: f64, norm_a: f64, norm_b: f64) -> f64 {
        let score = dot / (norm_a * norm_b);
        if self.half_scores {
            round_half(score)
        } else {
            score
        }
    }
}

impl Default for Arithmetic {
    fn default() -> Self {
        Self::NATIVE
    }
}

#[inline]
fn round_half(x: f64) -> f64 {
    f16::from_f64(x).to_f64()
}

/// Round a norm to `f16`, falling back to `f32` past the `f16` range.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn round_norm(norm: f64) -> f64 {
    let half = round_half(norm);
    if half.is_infinite() && norm.is_finite() {
        f64::from(norm as f32)
    } else {
        half
    }
}
