//! Inspect command implementation.

use std::path::Path;

use simrec::{Layout, Matrix};

use crate::config::Settings;
use crate::error::Result;
use crate::input::load_matrix;
use crate::output::{format_info, InfoRow};

/// Show the layout, shape and memory footprint of a matrix.
pub fn run(path: &Path, settings: &Settings) -> Result<()> {
    let matrix = load_matrix(path)?;
    let output = format_info(describe(&matrix), settings.format)?;
    println!("{output}");
    Ok(())
}

fn describe(matrix: &Matrix) -> Vec<InfoRow> {
    let (rows, cols) = matrix.shape();
    let layout = match matrix.layout() {
        Layout::Dense => "dense",
        Layout::Sparse => "sparse",
    };

    let mut info = vec![
        InfoRow::new("Layout", layout),
        InfoRow::new("Rows", rows),
        InfoRow::new("Columns", cols),
        InfoRow::new("Kind", matrix.kind()),
        InfoRow::new("Stored values", matrix.stored_len()),
        InfoRow::new("Value bytes", matrix.value_bytes()),
    ];

    match matrix.normalized() {
        Ok(narrowed) => {
            info.push(InfoRow::new("Narrowed kind", narrowed.kind()));
            info.push(InfoRow::new("Narrowed bytes", narrowed.value_bytes()));
        }
        Err(e) => {
            tracing::debug!(error = %e, "matrix cannot be narrowed");
            info.push(InfoRow::new("Narrowed kind", "unsupported"));
        }
    }

    info
}
