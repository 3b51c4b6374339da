//! Cosine similarity over compressed-row sparse storage.
//!
//! Every kernel walks stored non-zeros only; no dense copy of an input is
//! ever materialized. Results match the dense engine on the same data.

use std::borrow::Cow;

use tracing::debug;

use super::scalar::{l2_norm, sparse_dot_product};
use crate::error::{check_dimension, Result};
use crate::precision::{with_slice, Arithmetic, Element};
use crate::types::{ScoreMatrix, SparseMatrix, SparseVector};

/// Dot product of `v` against every row of `matrix`.
///
/// Each row is a sorted merge-join against the query's stored entries.
///
/// # Errors
///
/// Returns a dimension mismatch if `v.dim()` differs from the column count.
pub fn sparse_dot_against_matrix(v: &SparseVector, matrix: &SparseMatrix) -> Result<Vec<f64>> {
    check_dimension(matrix.num_cols(), v.dim())?;
    let query = v.values().to_f64_vec();
    Ok(with_slice!(matrix.values(), |data| {
        sparse_dots_against_rows(v.indices(), &query, matrix, data)
    }))
}

/// L2 norm of every row, from the stored non-zeros.
#[must_use]
pub fn sparse_row_norms(matrix: &SparseMatrix) -> Vec<f64> {
    with_slice!(matrix.values(), |data| {
        (0..matrix.num_rows()).map(|row| l2_norm(&data[matrix.row_span(row)])).collect()
    })
}

/// Cosine similarity of `v` against every row of `matrix`.
///
/// # Errors
///
/// Returns an error if narrowing fails or the dimensions disagree.
pub fn sparse_cosine_against_matrix(
    v: &SparseVector,
    matrix: &SparseMatrix,
    cast: bool,
) -> Result<Vec<f64>> {
    let (v, matrix) = if cast {
        (Cow::Owned(v.normalized()?), Cow::Owned(matrix.normalized()?))
    } else {
        (Cow::Borrowed(v), Cow::Borrowed(matrix))
    };
    let arithmetic = Arithmetic::for_operands(v.kind(), matrix.kind(), cast);

    let dots = sparse_dot_against_matrix(&v, &matrix)?;
    let v_norm = arithmetic.norm(with_slice!(v.values(), |data| l2_norm(data)));

    Ok(dots
        .into_iter()
        .zip(sparse_row_norms(&matrix))
        .map(|(dot, norm)| arithmetic.cosine(dot, v_norm, arithmetic.norm(norm)))
        .collect())
}

/// Cosine similarity between every pair of rows, as a dense score matrix.
///
/// # Errors
///
/// Returns an error if narrowing fails.
pub fn sparse_all_pairs_cosine(matrix: &SparseMatrix, cast: bool) -> Result<ScoreMatrix> {
    let matrix = if cast { Cow::Owned(matrix.normalized()?) } else { Cow::Borrowed(matrix) };
    let arithmetic = Arithmetic::for_kind(matrix.kind(), cast);
    let rows = matrix.num_rows();
    debug!(
        rows,
        cols = matrix.num_cols(),
        nnz = matrix.nnz(),
        cast,
        "computing sparse all-pairs cosine"
    );

    let norms: Vec<f64> =
        sparse_row_norms(&matrix).into_iter().map(|n| arithmetic.norm(n)).collect();
    let mut scores = vec![0.0; rows * rows];

    with_slice!(matrix.values(), |data| {
        for i in 0..rows {
            let a = matrix.row_span(i);
            for j in i..rows {
                let b = matrix.row_span(j);
                let dot = sparse_dot_product(
                    &matrix.indices()[a.clone()],
                    &data[a.clone()],
                    &matrix.indices()[b.clone()],
                    &data[b],
                );
                let score = arithmetic.cosine(dot, norms[i], norms[j]);
                scores[i * rows + j] = score;
                scores[j * rows + i] = score;
            }
        }
    });

    Ok(ScoreMatrix::new(rows, rows, scores))
}

/// Merge-join a sorted query against every row of `matrix`, whose stored
/// values are `data`.
pub(crate) fn sparse_dots_against_rows<A: Element, B: Element>(
    query_indices: &[u32],
    query_values: &[A],
    matrix: &SparseMatrix,
    data: &[B],
) -> Vec<f64> {
    (0..matrix.num_rows())
        .map(|row| {
            let span = matrix.row_span(row);
            sparse_dot_product(
                query_indices,
                query_values,
                &matrix.indices()[span.clone()],
                &data[span],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimilarityError;
    use crate::similarity::dense;
    use crate::types::DenseMatrix;

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

    fn sample_dense() -> DenseMatrix {
        DenseMatrix::from_rows(vec![
            vec![1.0_f32, 0.0, 3.0, 0.0, 4.0],
            vec![0.0, 2.0, 0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 5.0, 4.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_dot_against_matrix_touches_overlap_only() {
        let matrix = SparseMatrix::from_dense(&sample_dense());
        let v = SparseVector::from_pairs(5, vec![(0, 1_i64), (4, 2)]).unwrap();
        let dots = sparse_dot_against_matrix(&v, &matrix).unwrap();
        assert_eq!(dots, vec![9.0, 0.0, 9.0, 0.0]);
    }

    #[test]
    fn test_dot_against_matrix_dimension_mismatch() {
        let matrix = SparseMatrix::from_dense(&sample_dense());
        let v = SparseVector::from_pairs(4, vec![(0, 1_i64)]).unwrap();
        assert!(matches!(
            sparse_dot_against_matrix(&v, &matrix),
            Err(SimilarityError::DimensionMismatch { expected: 5, actual: 4 })
        ));
    }

    #[test]
    fn test_row_norms_match_dense() {
        let dense = sample_dense();
        let sparse = SparseMatrix::from_dense(&dense);
        assert_eq!(sparse_row_norms(&sparse), dense::row_norms(&dense));
    }

    #[test]
    fn test_cosine_against_matrix_matches_dense() {
        let dense = sample_dense();
        let sparse = SparseMatrix::from_dense(&dense);

        for cast in [false, true] {
            for row in 0..3 {
                let expected =
                    dense::cosine_against_matrix(&dense.row(row).unwrap(), &dense, cast).unwrap();
                let actual =
                    sparse_cosine_against_matrix(&sparse.row(row).unwrap(), &sparse, cast)
                        .unwrap();
                for (e, a) in expected.iter().zip(&actual) {
                    if e.is_nan() {
                        assert!(a.is_nan());
                    } else {
                        assert_near(*e, *a, EPSILON);
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_pairs_matches_dense() {
        let dense = sample_dense();
        let sparse = SparseMatrix::from_dense(&dense);

        let expected = dense::all_pairs_cosine(&dense, true).unwrap();
        let actual = sparse_all_pairs_cosine(&sparse, true).unwrap();
        assert_eq!(actual.shape(), (4, 4));

        for (e, a) in expected.as_slice().iter().zip(actual.as_slice()) {
            if e.is_nan() {
                assert!(a.is_nan());
            } else {
                assert_near(*e, *a, EPSILON);
            }
        }
    }

    #[test]
    fn test_all_pairs_diagonal_and_zero_row() {
        let sparse = SparseMatrix::from_dense(&sample_dense());
        let scores = sparse_all_pairs_cosine(&sparse, true).unwrap();

        for i in 0..3 {
            assert_near(scores.get(i, i).unwrap(), 1.0, HALF_EPSILON);
        }
        assert!(scores.get(3, 3).unwrap().is_nan());
        assert_eq!(scores.get(0, 1), scores.get(1, 0));
    }

    #[test]
    fn test_cast_rejects_unsigned() {
        let matrix = SparseMatrix::from_triplets((1, 2), vec![(0, 1, 3_u8)]).unwrap();
        let v = matrix.row(0).unwrap();
        assert!(matches!(
            sparse_cosine_against_matrix(&v, &matrix, true),
            Err(SimilarityError::UnsupportedDtype { .. })
        ));
        assert_near(sparse_cosine_against_matrix(&v, &matrix, false).unwrap()[0], 1.0, EPSILON);
    }
}
