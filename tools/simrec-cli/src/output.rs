//! Output formatting utilities.

use serde::Serialize;
use simrec::{NeighborMatrix, ScoreMatrix};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;
use crate::OutputFormat;

/// A simple key-value row for displaying info.
#[derive(Tabled, Serialize)]
pub struct InfoRow {
    #[tabled(rename = "Property")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl InfoRow {
    /// Create a row from anything displayable.
    pub fn new(key: &str, value: impl ToString) -> Self {
        Self { key: key.to_string(), value: value.to_string() }
    }
}

/// One scored row, as printed by `similar`.
#[derive(Tabled, Serialize)]
pub struct ScoreRow {
    #[tabled(rename = "Row")]
    pub row: usize,
    #[tabled(rename = "Score", display_with = "format_score")]
    pub score: f64,
}

/// Format key-value info rows.
pub fn format_info(rows: Vec<InfoRow>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> =
                rows.into_iter().map(|r| (r.key, serde_json::Value::String(r.value))).collect();
            Ok(serde_json::to_string_pretty(&map)?)
        }
        OutputFormat::Csv => {
            format_csv(["property", "value"], rows.into_iter().map(|r| vec![r.key, r.value]))
        }
    }
}

/// Format the scores of one row against every row.
pub fn format_scores(rows: Vec<ScoreRow>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let count = rows.len();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            Ok(format!("{table}\n({count} rows)"))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => format_csv(
            ["row", "score"],
            rows.into_iter().map(|r| vec![r.row.to_string(), r.score.to_string()]),
        ),
    }
}

/// Format an all-pairs score matrix.
pub fn format_score_matrix(scores: &ScoreMatrix, format: OutputFormat) -> Result<String> {
    let (_, cols) = scores.shape();
    match format {
        OutputFormat::Table => {
            let rows = scores
                .rows()
                .enumerate()
                .map(|(i, row)| labeled(i, row.iter().map(|&s| format_score(&s))));
            Ok(format_table(cols, rows))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(scores)?),
        OutputFormat::Csv => format_csv(
            header(cols),
            scores.rows().enumerate().map(|(i, row)| labeled(i, row.iter().map(f64::to_string))),
        ),
    }
}

/// Format a top-K neighbor matrix.
pub fn format_neighbors(neighbors: &NeighborMatrix, format: OutputFormat) -> Result<String> {
    let k = neighbors.k();
    let rows =
        neighbors.rows().enumerate().map(|(i, row)| labeled(i, row.iter().map(u32::to_string)));
    match format {
        OutputFormat::Table => Ok(format_table(k, rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(neighbors)?),
        OutputFormat::Csv => format_csv(header(k), rows),
    }
}

/// Format a score for display. NaN marks a zero-norm operand.
#[allow(clippy::trivially_copy_pass_by_ref)] // signature required by tabled's display_with
pub fn format_score(score: &f64) -> String {
    if score.is_nan() {
        "NaN".to_string()
    } else {
        format!("{score:.4}")
    }
}

fn header(cols: usize) -> Vec<String> {
    std::iter::once("row".to_string()).chain((0..cols).map(|c| c.to_string())).collect()
}

fn labeled(row: usize, cells: impl Iterator<Item = String>) -> Vec<String> {
    std::iter::once(row.to_string()).chain(cells).collect()
}

fn format_table(cols: usize, rows: impl Iterator<Item = Vec<String>>) -> String {
    let mut builder = tabled::builder::Builder::new();
    builder.push_record(header(cols));

    let mut count = 0;
    for row in rows {
        builder.push_record(row);
        count += 1;
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    format!("{table}\n({count} rows)")
}

fn format_csv<H, R>(header: H, rows: R) -> Result<String>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use simrec::{top_k_neighbors, CosineSimilarity, DenseMatrix};

    use super::*;

    fn sample() -> DenseMatrix {
        DenseMatrix::from_rows(vec![vec![1_i64, 0], vec![0, 1], vec![1, 1]]).unwrap()
    }

    #[test]
    fn test_neighbors_csv() {
        let neighbors = top_k_neighbors(&sample(), 1, false).unwrap();
        let csv = format_neighbors(&neighbors, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "row,0\n0,0\n1,1\n2,2\n");
    }

    #[test]
    fn test_neighbors_json() {
        let neighbors = top_k_neighbors(&sample(), 1, false).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_neighbors(&neighbors, OutputFormat::Json).unwrap())
                .unwrap();
        assert_eq!(json["k"], 1);
        assert_eq!(json["indices"], serde_json::json!([0, 1, 2]));
    }

    #[test]
    fn test_score_matrix_table() {
        let scores = sample().all_pairs_cosine(false).unwrap();
        let table = format_score_matrix(&scores, OutputFormat::Table).unwrap();
        assert!(table.contains("1.0000"));
        assert!(table.contains("0.7071"));
        assert!(table.ends_with("(3 rows)"));
    }

    #[test]
    fn test_format_score_nan() {
        assert_eq!(format_score(&f64::NAN), "NaN");
        assert_eq!(format_score(&0.5), "0.5000");
    }

    #[test]
    fn test_info_csv() {
        let csv = format_info(vec![InfoRow::new("Rows", 3)], OutputFormat::Csv).unwrap();
        assert_eq!(csv, "property,value\nRows,3\n");
    }
}
