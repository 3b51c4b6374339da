//! All-pairs command implementation.

use std::path::Path;

use simrec::CosineSimilarity;

use crate::config::Settings;
use crate::error::Result;
use crate::input::load_matrix;
use crate::output::format_score_matrix;

/// Print the cosine similarity between every pair of rows.
pub fn run(path: &Path, settings: &Settings) -> Result<()> {
    let matrix = load_matrix(path)?;
    let scores = matrix.all_pairs_cosine(settings.cast)?;

    let output = format_score_matrix(&scores, settings.format)?;
    println!("{output}");
    Ok(())
}
