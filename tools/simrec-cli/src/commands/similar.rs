//! Similar command implementation.

use std::path::Path;

use simrec::similarity::{dense, sparse};
use simrec::Matrix;

use crate::config::Settings;
use crate::error::Result;
use crate::input::load_matrix;
use crate::output::{format_scores, ScoreRow};

/// Score one row against every row of the matrix.
pub fn run(path: &Path, row: usize, settings: &Settings) -> Result<()> {
    let matrix = load_matrix(path)?;
    let scores = score_row(&matrix, row, settings.cast)?;

    let rows = scores.into_iter().enumerate().map(|(row, score)| ScoreRow { row, score }).collect();
    let output = format_scores(rows, settings.format)?;
    println!("{output}");
    Ok(())
}

fn score_row(matrix: &Matrix, row: usize, cast: bool) -> Result<Vec<f64>> {
    let scores = match matrix {
        Matrix::Dense(m) => dense::cosine_against_matrix(&m.row(row)?, m, cast)?,
        Matrix::Sparse(m) => sparse::sparse_cosine_against_matrix(&m.row(row)?, m, cast)?,
    };
    Ok(scores)
}
