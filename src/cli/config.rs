//! TOML configuration file support for `exfilms extract`.
//!
//! Instead of passing many CLI flags, settings can be kept in a config file.
//! A `[filter]`, `[target]` or `[range]` table enables that filter:
//!
//! ```toml
//! # exfilms.toml
//! [output]
//! directory = "/data/json"
//! precision = 4
//! metadata = false
//! log_file = "/data/json/exfilms.log"
//!
//! [filter]
//! ms_level = [1]
//! spectrum_type = ["centroid"]
//! polarity = ["positive"]
//!
//! [target]
//! file = "targets.tsv"
//! mz_tolerance = 0.005
//! ppm_tolerance = 5
//! ```
//!
//! Flags given on the command line take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure for exfilms.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    /// Spectrum classification filter
    pub filter: Option<FilterConfig>,

    /// Target list filtering
    pub target: Option<TargetConfig>,

    /// m/z range filtering
    pub range: Option<RangeConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
    /// Decimal places kept in measurements and arrays
    pub precision: Option<u32>,
    /// Drop the m/z and intensity arrays
    pub metadata: Option<bool>,
    pub log_file: Option<PathBuf>,
    /// msconvert-compatible program for vendor formats
    pub converter: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub ms_level: Vec<i64>,
    #[serde(default)]
    pub spectrum_type: Vec<String>,
    #[serde(default)]
    pub polarity: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Local `.tsv` path or HTTP(S) URL
    pub file: Option<String>,
    pub mz_tolerance: Option<f64>,
    pub ppm_tolerance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeConfig {
    pub min_mz: Option<f64>,
    pub max_mz: Option<f64>,
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
}
