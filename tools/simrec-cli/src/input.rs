//! Matrix documents.
//!
//! A matrix is read from a JSON document in one of two layouts:
//!
//! ```json
//! {"layout": "dense", "kind": "float32", "rows": [[1, 2, 3], [4, 5, 6]]}
//! {"layout": "sparse", "kind": "int64", "shape": [3, 5], "entries": [[0, 1, 2], [2, 4, 1]]}
//! ```
//!
//! Sparse entries are `[row, column, value]` triplets. Every value must be
//! representable in the declared kind.

use std::path::Path;

use half::f16;
use serde::Deserialize;
use simrec::precision::Element;
use simrec::{DenseMatrix, Matrix, NumericKind, SparseMatrix};

use crate::error::{CliError, Result};

/// A matrix as it appears on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum MatrixDocument {
    /// Every cell listed, row by row.
    Dense {
        /// Element kind to store the values as.
        kind: NumericKind,
        /// The rows.
        rows: Vec<Vec<f64>>,
    },
    /// Only non-zero cells listed.
    Sparse {
        /// Element kind to store the values as.
        kind: NumericKind,
        /// `(rows, cols)`.
        shape: (usize, usize),
        /// `(row, column, value)` triplets.
        entries: Vec<(usize, u32, f64)>,
    },
}

/// Read and build the matrix stored at `path`.
pub fn load_matrix(path: &Path) -> Result<Matrix> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let document: MatrixDocument = serde_json::from_str(&contents)?;
    document.into_matrix()
}

impl MatrixDocument {
    /// Build the matrix in its declared layout and kind.
    pub fn into_matrix(self) -> Result<Matrix> {
        match self {
            Self::Dense { kind, rows } => match kind {
                NumericKind::Int8 => dense::<i8>(rows),
                NumericKind::Int16 => dense::<i16>(rows),
                NumericKind::Int32 => dense::<i32>(rows),
                NumericKind::Int64 => dense::<i64>(rows),
                NumericKind::UInt8 => dense::<u8>(rows),
                NumericKind::UInt16 => dense::<u16>(rows),
                NumericKind::UInt32 => dense::<u32>(rows),
                NumericKind::UInt64 => dense::<u64>(rows),
                NumericKind::Float16 => dense::<f16>(rows),
                NumericKind::Float32 => dense::<f32>(rows),
                NumericKind::Float64 => dense::<f64>(rows),
                NumericKind::Bool => dense::<bool>(rows),
            },
            Self::Sparse { kind, shape, entries } => match kind {
                NumericKind::Int8 => sparse::<i8>(shape, entries),
                NumericKind::Int16 => sparse::<i16>(shape, entries),
                NumericKind::Int32 => sparse::<i32>(shape, entries),
                NumericKind::Int64 => sparse::<i64>(shape, entries),
                NumericKind::UInt8 => sparse::<u8>(shape, entries),
                NumericKind::UInt16 => sparse::<u16>(shape, entries),
                NumericKind::UInt32 => sparse::<u32>(shape, entries),
                NumericKind::UInt64 => sparse::<u64>(shape, entries),
                NumericKind::Float16 => sparse::<f16>(shape, entries),
                NumericKind::Float32 => sparse::<f32>(shape, entries),
                NumericKind::Float64 => sparse::<f64>(shape, entries),
                NumericKind::Bool => sparse::<bool>(shape, entries),
            },
        }
    }
}

fn dense<T: FromJson>(rows: Vec<Vec<f64>>) -> Result<Matrix> {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(T::from_json).collect::<Result<Vec<T>>>())
        .collect::<Result<Vec<_>>>()?;
    Ok(DenseMatrix::from_rows(rows)?.into())
}

fn sparse<T: FromJson>(shape: (usize, usize), entries: Vec<(usize, u32, f64)>) -> Result<Matrix> {
    let entries = entries
        .into_iter()
        .map(|(row, col, value)| Ok((row, col, T::from_json(value)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(SparseMatrix::from_triplets(shape, entries)?.into())
}

/// Exact conversion from a JSON number.
trait FromJson: simrec::precision::Element {
    fn from_json(value: f64) -> Result<Self>;
}

macro_rules! impl_from_json_int {
    ($($ty:ty),*) => {
        $(
            impl FromJson for $ty {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                fn from_json(value: f64) -> Result<Self> {
                    // MAX + 1 is a power of two and exact in f64; the 64-bit MAX is not.
                    let upper = <$ty>::MAX as f64 + 1.0;
                    let in_range = value >= <$ty>::MIN as f64 && value < upper;
                    if value.fract() == 0.0 && in_range {
                        Ok(value as $ty)
                    } else {
                        Err(not_representable(value, Self::KIND))
                    }
                }
            }
        )*
    };
}

impl_from_json_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromJson for f16 {
    fn from_json(value: f64) -> Result<Self> {
        Ok(f16::from_f64(value))
    }
}

impl FromJson for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_json(value: f64) -> Result<Self> {
        Ok(value as f32)
    }
}

impl FromJson for f64 {
    fn from_json(value: f64) -> Result<Self> {
        Ok(value)
    }
}

impl FromJson for bool {
    fn from_json(value: f64) -> Result<Self> {
        if value == 0.0 {
            Ok(false)
        } else if value == 1.0 {
            Ok(true)
        } else {
            Err(not_representable(value, Self::KIND))
        }
    }
}

fn not_representable(value: f64, kind: NumericKind) -> CliError {
    CliError::InvalidInput(format!("{value} is not representable as {kind}"))
}

#[cfg(test)]
mod tests {
    use simrec::Layout;

    use super::*;

    fn parse(json: &str) -> Result<Matrix> {
        serde_json::from_str::<MatrixDocument>(json)?.into_matrix()
    }

    #[test]
    fn test_dense_document() {
        let matrix = parse(r#"{"layout": "dense", "kind": "float32", "rows": [[1, 2], [3, 4]]}"#)
            .unwrap();
        assert_eq!(matrix.layout(), Layout::Dense);
        assert_eq!(matrix.kind(), NumericKind::Float32);
        assert_eq!(matrix.shape(), (2, 2));
    }

    #[test]
    fn test_sparse_document() {
        let matrix = parse(
            r#"{"layout": "sparse", "kind": "int64", "shape": [3, 5],
                "entries": [[0, 1, 2], [2, 4, 1]]}"#,
        )
        .unwrap();
        assert_eq!(matrix.layout(), Layout::Sparse);
        assert_eq!(matrix.shape(), (3, 5));
        assert_eq!(matrix.stored_len(), 2);
    }

    #[test]
    fn test_fractional_integer_rejected() {
        let result = parse(r#"{"layout": "dense", "kind": "int16", "rows": [[1.5]]}"#);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        let result = parse(r#"{"layout": "dense", "kind": "int8", "rows": [[300]]}"#);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_integer_max_bounds() {
        let result =
            parse(r#"{"layout": "dense", "kind": "int64", "rows": [[9223372036854775807]]}"#);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        let result =
            parse(r#"{"layout": "dense", "kind": "uint64", "rows": [[18446744073709551615]]}"#);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        assert!(parse(r#"{"layout": "dense", "kind": "int32", "rows": [[2147483647]]}"#).is_ok());
        assert!(parse(r#"{"layout": "dense", "kind": "int64", "rows": [[-9223372036854775808]]}"#)
            .is_ok());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = parse(r#"{"layout": "dense", "kind": "int64", "rows": [[1, 2], [3]]}"#);
        assert!(matches!(result, Err(CliError::Similarity(_))));
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let result = parse(r#"{"layout": "banded", "kind": "int64", "rows": []}"#);
        assert!(matches!(result, Err(CliError::Json(_))));
    }
}
