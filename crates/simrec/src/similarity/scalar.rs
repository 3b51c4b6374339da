//! Scalar kernels shared by the dense and sparse engines.
//!
//! Every kernel widens elements to `f64` and accumulates in `f64`; rounding to
//! the narrowed precision is applied afterwards by
//! [`Arithmetic`](crate::precision::Arithmetic).

use std::cmp::Ordering;

use crate::precision::Element;

/// Dot product of two equally long slices.
///
/// # Panics
///
/// Debug-panics if the slices have different lengths.
#[inline]
#[must_use]
pub fn dot_product<A: Element, B: Element>(a: &[A], b: &[B]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b).map(|(&x, &y)| x.to_f64() * y.to_f64()).sum()
}

/// Sum of squares (squared L2 norm).
#[inline]
#[must_use]
pub fn sum_of_squares<T: Element>(v: &[T]) -> f64 {
    v.iter()
        .map(|&x| {
            let x = x.to_f64();
            x * x
        })
        .sum()
}

/// L2 norm (magnitude).
#[inline]
#[must_use]
pub fn l2_norm<T: Element>(v: &[T]) -> f64 {
    sum_of_squares(v).sqrt()
}

/// Cosine similarity of two dense slices at full precision.
///
/// Zero-magnitude operands are not guarded: the result is NaN or infinite.
///
/// # Panics
///
/// Debug-panics if the slices have different lengths.
#[inline]
#[must_use]
pub fn cosine_similarity<A: Element, B: Element>(a: &[A], b: &[B]) -> f64 {
    dot_product(a, b) / (l2_norm(a) * l2_norm(b))
}

/// Dot product of two sparse vectors given as sorted index/value slices.
///
/// Both index slices must be sorted in ascending order.
/// Time complexity: O(n + m) where n and m are the number of stored entries.
#[inline]
#[must_use]
pub fn sparse_dot_product<A: Element, B: Element>(
    a_indices: &[u32],
    a_values: &[A],
    b_indices: &[u32],
    b_values: &[B],
) -> f64 {
    let mut result = 0.0;
    let mut i = 0;
    let mut j = 0;

    while i < a_indices.len() && j < b_indices.len() {
        match a_indices[i].cmp(&b_indices[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result += a_values[i].to_f64() * b_values[j].to_f64();
                i += 1;
                j += 1;
            }
        }
    }

    result
}
