//! Top-K command implementation.

use std::path::Path;

use simrec::{TopKConfig, TopKFinder};

use crate::config::Settings;
use crate::error::Result;
use crate::input::load_matrix;
use crate::output::format_neighbors;

/// Print the top-K neighbors of every row.
pub fn run(path: &Path, config: TopKConfig, settings: &Settings) -> Result<()> {
    let matrix = load_matrix(path)?;
    let neighbors = TopKFinder::new(&matrix, config)?.run()?;

    let output = format_neighbors(&neighbors, settings.format)?;
    println!("{output}");
    Ok(())
}
