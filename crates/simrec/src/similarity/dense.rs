//! Cosine similarity over dense vectors and matrices.

use std::borrow::Cow;

use tracing::debug;

use super::scalar::{cosine_similarity, dot_product, l2_norm};
use crate::error::{check_dimension, Result};
use crate::precision::{normalize, with_slice, Arithmetic, Element, Values};
use crate::types::{rows_of, DenseMatrix, ScoreMatrix};

/// Cosine similarity of two dense vectors at full precision.
///
/// Zero-magnitude operands are not guarded: the result is NaN or infinite.
///
/// # Errors
///
/// Returns [`SimilarityError::DimensionMismatch`](crate::SimilarityError::DimensionMismatch)
/// if the vectors differ in length.
///
/// # Example
///
/// ```
/// use simrec::precision::Values;
/// use simrec::similarity::dense::cosine;
///
/// let a = Values::from(vec![1_i64, 2, 3, 5, 4]);
/// let b = Values::from(vec![1_i64, 2, 3, 4, 5]);
/// let score = cosine(&a, &b).unwrap();
/// assert!(score > 0.9 && score < 1.0);
/// ```
pub fn cosine(v1: &Values, v2: &Values) -> Result<f64> {
    check_dimension(v1.len(), v2.len())?;
    let a = v1.to_f64_vec();
    Ok(with_slice!(v2, |b| cosine_similarity(&a, b)))
}

/// Dot product of `v` against every row of `matrix` (M · vᵀ).
///
/// # Errors
///
/// Returns a dimension mismatch if `v.len()` differs from the column count.
pub fn dot_against_matrix(v: &Values, matrix: &DenseMatrix) -> Result<Vec<f64>> {
    check_dimension(matrix.num_cols(), v.len())?;
    let query = v.to_f64_vec();
    let (rows, cols) = matrix.shape();
    Ok(with_slice!(matrix.values(), |data| dots_against_rows(&query, data, rows, cols)))
}

/// L2 norm of every row.
#[must_use]
pub fn row_norms(matrix: &DenseMatrix) -> Vec<f64> {
    let (rows, cols) = matrix.shape();
    with_slice!(matrix.values(), |data| rows_of(data, rows, cols).map(l2_norm).collect())
}

/// Cosine similarity of `v` against every row of `matrix`.
///
/// With `cast`, both operands are narrowed first and row norms are
/// rounded to half precision (see [`Arithmetic`]), trading accuracy for
/// memory. Without it, the computation runs in `f64`.
///
/// # Errors
///
/// Returns an error if narrowing fails or the dimensions disagree.
pub fn cosine_against_matrix(v: &Values, matrix: &DenseMatrix, cast: bool) -> Result<Vec<f64>> {
    let (v, matrix) = narrow_operands(v, matrix, cast)?;
    let arithmetic = Arithmetic::for_operands(v.kind(), matrix.kind(), cast);

    let dots = dot_against_matrix(&v, &matrix)?;
    let v_norm = arithmetic.norm(with_slice!(v.as_ref(), |data| l2_norm(data)));

    Ok(dots
        .into_iter()
        .zip(row_norms(&matrix))
        .map(|(dot, norm)| arithmetic.cosine(dot, v_norm, arithmetic.norm(norm)))
        .collect())
}

/// Cosine similarity between every pair of rows.
///
/// The result is the Gram matrix M · Mᵀ divided elementwise by the outer
/// product of the row norms. It is symmetric and its diagonal is 1 for every
/// non-zero row.
///
/// # Errors
///
/// Returns an error if narrowing fails.
pub fn all_pairs_cosine(matrix: &DenseMatrix, cast: bool) -> Result<ScoreMatrix> {
    let matrix = if cast { Cow::Owned(matrix.normalized()?) } else { Cow::Borrowed(matrix) };
    let arithmetic = Arithmetic::for_kind(matrix.kind(), cast);
    let (rows, cols) = matrix.shape();
    debug!(rows, cols, cast, "computing dense all-pairs cosine");

    let norms: Vec<f64> = row_norms(&matrix).into_iter().map(|n| arithmetic.norm(n)).collect();
    let gram = with_slice!(matrix.values(), |data| gram_matrix(data, rows, cols));

    let scores = gram
        .iter()
        .enumerate()
        .map(|(pos, &dot)| arithmetic.cosine(dot, norms[pos / rows], norms[pos % rows]))
        .collect();

    Ok(ScoreMatrix::new(rows, rows, scores))
}

fn narrow_operands<'a>(
    v: &'a Values,
    matrix: &'a DenseMatrix,
    cast: bool,
) -> Result<(Cow<'a, Values>, Cow<'a, DenseMatrix>)> {
    if cast {
        Ok((Cow::Owned(normalize(v)?), Cow::Owned(matrix.normalized()?)))
    } else {
        Ok((Cow::Borrowed(v), Cow::Borrowed(matrix)))
    }
}

pub(crate) fn dots_against_rows<A: Element, B: Element>(
    query: &[A],
    data: &[B],
    rows: usize,
    cols: usize,
) -> Vec<f64> {
    rows_of(data, rows, cols).map(|row| dot_product(query, row)).collect()
}

/// Row-major M · Mᵀ, computing each unordered pair once.
fn gram_matrix<T: Element>(data: &[T], rows: usize, cols: usize) -> Vec<f64> {
    let mut gram = vec![0.0; rows * rows];
    let all: Vec<&[T]> = rows_of(data, rows, cols).collect();

    for (i, &a) in all.iter().enumerate() {
        for (j, &b) in all.iter().enumerate().skip(i) {
            let dot = dot_product(a, b);
            gram[i * rows + j] = dot;
            gram[j * rows + i] = dot;
        }
    }

    gram
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimilarityError;

    const EPSILON: f64 = 1e-9;
    const HALF_EPSILON: f64 = 1e-2;

    fn assert_near(a: f64, b: f64, epsilon: f64) {
        assert!(
            (a - b).abs() < epsilon,
            "assertion failed: {} !~ {} (diff: {})",
            a,
            b,
            (a - b).abs()
        );
    }

    fn sample_matrix() -> DenseMatrix {
        DenseMatrix::from_rows(vec![
            vec![1_i64, 2, 3, 5, 4],
            vec![1, 2, 3, 4, 5],
            vec![1, 3, 2, 4, 4],
        ])
        .unwrap()
    }

    #[test]
    fn test_cosine_reference_pair() {
        let v1 = Values::from(vec![1_i64, 2, 3, 5, 4]);
        let v2 = Values::from(vec![1_i64, 2, 3, 4, 5]);
        // dot = 54, |v1| = |v2| = sqrt(55)
        assert_near(cosine(&v1, &v2).unwrap(), 54.0 / 55.0, EPSILON);
    }

    #[test]
    fn test_cosine_symmetric() {
        let v1 = Values::from(vec![1.0_f64, -2.0, 0.5]);
        let v2 = Values::from(vec![0.3_f32, 0.0, 7.0]);
        assert_near(cosine(&v1, &v2).unwrap(), cosine(&v2, &v1).unwrap(), EPSILON);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let v1 = Values::from(vec![1_i64, 2]);
        let v2 = Values::from(vec![1_i64, 2, 3]);
        assert!(matches!(
            cosine(&v1, &v2),
            Err(SimilarityError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_cosine_zero_vector_is_nan() {
        let zero = Values::from(vec![0_i64, 0]);
        let v = Values::from(vec![1_i64, 0]);
        assert!(cosine(&zero, &v).unwrap().is_nan());
    }

    #[test]
    fn test_dot_against_matrix() {
        let v = Values::from(vec![1_i64, 2, 3, 5, 4]);
        let dots = dot_against_matrix(&v, &sample_matrix()).unwrap();
        assert_eq!(dots, vec![55.0, 54.0, 53.0]);
    }

    #[test]
    fn test_row_norms() {
        let norms = row_norms(&sample_matrix());
        assert_near(norms[0], 55_f64.sqrt(), EPSILON);
        assert_near(norms[2], 46_f64.sqrt(), EPSILON);
    }

    #[test]
    fn test_cosine_against_matrix_native() {
        let v = Values::from(vec![1_i64, 2, 3, 5, 4]);
        let scores = cosine_against_matrix(&v, &sample_matrix(), false).unwrap();
        assert_near(scores[0], 1.0, EPSILON);
        assert_near(scores[1], 54.0 / 55.0, EPSILON);
        assert_near(scores[2], 53.0 / (55_f64.sqrt() * 46_f64.sqrt()), EPSILON);
    }

    #[test]
    fn test_cosine_against_matrix_cast_close_to_native() {
        let v = Values::from(vec![1.0_f64, 2.0, 3.0, 5.0, 4.0]);
        let matrix = DenseMatrix::from_rows(vec![
            vec![1.0_f64, 2.0, 3.0, 5.0, 4.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        ])
        .unwrap();

        let native = cosine_against_matrix(&v, &matrix, false).unwrap();
        let half = cosine_against_matrix(&v, &matrix, true).unwrap();
        for (n, h) in native.iter().zip(&half) {
            assert_near(*n, *h, HALF_EPSILON);
        }
    }

    #[test]
    fn test_cosine_against_matrix_rejects_unsigned_when_cast() {
        let v = Values::from(vec![1_u32, 2]);
        let matrix = DenseMatrix::from_rows(vec![vec![1_u32, 2]]).unwrap();
        assert!(matches!(
            cosine_against_matrix(&v, &matrix, true),
            Err(SimilarityError::UnsupportedDtype { .. })
        ));
        assert!(cosine_against_matrix(&v, &matrix, false).is_ok());
    }

    #[test]
    fn test_all_pairs_cosine_reference_matrix() {
        let scores = all_pairs_cosine(&sample_matrix(), true).unwrap();
        assert_eq!(scores.shape(), (3, 3));

        for d in scores.diagonal() {
            assert_near(d, 1.0, HALF_EPSILON);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(scores.get(i, j), scores.get(j, i));
            }
        }
        assert_near(scores.get(0, 1).unwrap(), 54.0 / 55.0, HALF_EPSILON);
    }

    #[test]
    fn test_all_pairs_cosine_native_diagonal_exact() {
        let scores = all_pairs_cosine(&sample_matrix(), false).unwrap();
        for d in scores.diagonal() {
            assert_near(d, 1.0, EPSILON);
        }
    }

    #[test]
    fn test_all_pairs_cosine_cast_large_norms() {
        let counts =
            DenseMatrix::from_rows(vec![vec![300_i64, 0, 0], vec![0, 300, 10], vec![290, 0, 5]])
                .unwrap();
        let scores = all_pairs_cosine(&counts, true).unwrap();
        for d in scores.diagonal() {
            assert_near(d, 1.0, HALF_EPSILON);
        }
        assert_near(scores.get(0, 2).unwrap(), 290.0 / 290_f64.hypot(5.0), HALF_EPSILON);

        let ratings =
            DenseMatrix::from_rows(vec![vec![300.0_f32, 0.0], vec![290.0, 5.0]]).unwrap();
        let scores = all_pairs_cosine(&ratings, true).unwrap();
        for d in scores.diagonal() {
            assert_near(d, 1.0, HALF_EPSILON);
        }
        assert_near(scores.get(0, 1).unwrap(), 290.0 / 290_f64.hypot(5.0), HALF_EPSILON);
    }

    #[test]
    fn test_all_pairs_cosine_zero_row_is_nan() {
        let matrix = DenseMatrix::from_rows(vec![vec![0.0_f32, 0.0], vec![1.0, 1.0]]).unwrap();
        let scores = all_pairs_cosine(&matrix, false).unwrap();
        assert!(scores.get(0, 0).unwrap().is_nan());
        assert!(scores.get(0, 1).unwrap().is_nan());
        assert_near(scores.get(1, 1).unwrap(), 1.0, EPSILON);
    }
}
