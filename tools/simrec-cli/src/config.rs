//! Configuration file support.
//!
//! An optional TOML file supplies defaults; explicit command line flags always
//! win over it.
//!
//! ```toml
//! cast = true
//! format = "json"
//!
//! [top_k]
//! k = 50
//! self_match = "exclude"
//! zero_norm = "reject"
//! progress_interval = 1000
//! ```
//!
//! The top-level `cast` applies to every command. A `cast` key under
//! `[top_k]` overrides it for top-K only, and `--no-cast` overrides both.

use std::path::Path;

use serde::Deserialize;
use simrec::{SelfMatch, TopKConfig, ZeroNormPolicy};

use crate::error::{CliError, Result};
use crate::{Cli, OutputFormat};

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Narrow to 16 bits before computing.
    pub cast: Option<bool>,
    /// Default output format.
    pub format: Option<OutputFormat>,
    /// Top-K defaults.
    pub top_k: TopKSection,
}

/// The `[top_k]` table. Unset keys fall back to [`TopKConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TopKSection {
    /// Neighbors per row.
    pub k: Option<usize>,
    /// Narrow before computing, for top-K only.
    pub cast: Option<bool>,
    /// Self-inclusion policy.
    pub self_match: Option<SelfMatch>,
    /// Zero-norm policy.
    pub zero_norm: Option<ZeroNormPolicy>,
    /// Rows between progress events.
    pub progress_interval: Option<usize>,
}

impl TopKSection {
    fn into_config(self, cast: bool) -> TopKConfig {
        let defaults = TopKConfig::default();
        TopKConfig {
            k: self.k.unwrap_or(defaults.k),
            cast,
            self_match: self.self_match.unwrap_or(defaults.self_match),
            zero_norm: self.zero_norm.unwrap_or(defaults.zero_norm),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
        }
    }
}

impl CliConfig {
    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|source| CliError::Config { path: path.to_path_buf(), source })
    }

    fn from_toml(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Effective settings after merging the configuration file with flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Narrow to 16 bits before computing.
    pub cast: bool,
    /// Output format.
    pub format: OutputFormat,
    top_k: TopKConfig,
}

impl Settings {
    /// Merge `config` under the flags of `cli`.
    pub fn resolve(config: CliConfig, cli: &Cli) -> Self {
        Self::merge(config, cli.no_cast, cli.format)
    }

    fn merge(config: CliConfig, no_cast: bool, format: Option<OutputFormat>) -> Self {
        let top_k_cast = !no_cast && config.top_k.cast.or(config.cast).unwrap_or(true);
        Self {
            cast: !no_cast && config.cast.unwrap_or(true),
            format: format.or(config.format).unwrap_or_default(),
            top_k: config.top_k.into_config(top_k_cast),
        }
    }

    /// Top-K configuration with command line overrides applied.
    pub fn top_k_config(
        &self,
        k: Option<usize>,
        exclude_self: bool,
        reject_zero_norm: bool,
    ) -> TopKConfig {
        let mut config = self.top_k.clone();
        if let Some(k) = k {
            config.k = k;
        }
        if exclude_self {
            config = config.with_self_match(SelfMatch::Exclude);
        }
        if reject_zero_norm {
            config = config.with_zero_norm(ZeroNormPolicy::Reject);
        }
        config
    }
}
