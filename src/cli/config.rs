//! TOML configuration file support.
//!
//! Settings that stay the same from plate to plate can live in a config file
//! instead of being repeated on every invocation:
//!
//! ```toml
//! # stagemap.toml
//! [matching]
//! tolerance = 0.002
//! table = "matched_positions.csv"
//!
//! [mapping]
//! acquisition_extension = ".nd2"
//!
//! [rename]
//! policy = "reject-ambiguous"
//! tile_extensions = ["tif", "tiff"]
//! dry_run = false
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use stagemap::mapping::MappingOptions;
use stagemap::matcher::DEFAULT_TOLERANCE;
use stagemap::rename::RenameOptions;
use stagemap::table::DEFAULT_TABLE_FILE;

/// Root configuration structure for stagemap.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Match stage settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Mapping key settings.
    #[serde(default)]
    pub mapping: MappingOptions,

    /// Rename stage settings.
    #[serde(default)]
    pub rename: RenameOptions,
}

/// Configuration for the match stage.
#[derive(Debug, Default, Deserialize)]
pub struct MatchingConfig {
    /// Absolute stage-position tolerance.
    pub tolerance: Option<f64>,

    /// Mapping table path.
    pub table: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the given file, or fall back to defaults when none was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Tolerance from the command line, then the file, then the default.
    pub fn tolerance(&self, flag: Option<f64>) -> f64 {
        flag.or(self.matching.tolerance).unwrap_or(DEFAULT_TOLERANCE)
    }

    /// Table path from the command line, then the file, then the default.
    pub fn table_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.matching.table.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TABLE_FILE))
    }
}
