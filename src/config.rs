//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.batowners.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".batowners.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Document discovery settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Owner extraction settings.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Log a progress line every this many documents.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_progress_interval() -> usize {
    100
}

/// Filename convention for documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Text before the sequence number.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Text after the sequence number.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            suffix: default_suffix(),
        }
    }
}

fn default_prefix() -> String {
    "Doginal_Bat_#".to_string()
}

fn default_suffix() -> String {
    ".html".to_string()
}

/// Where the owner field lives in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// CSS selector for label elements.
    #[serde(default = "default_label_selector")]
    pub label_selector: String,

    /// Label text to look for (compared trimmed and lowercased).
    #[serde(default = "default_label")]
    pub label: String,

    /// CSS selector the value element next to the label must match.
    #[serde(default = "default_value_selector")]
    pub value_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            label_selector: default_label_selector(),
            label: default_label(),
            value_selector: default_value_selector(),
        }
    }
}

fn default_label_selector() -> String {
    "dt".to_string()
}

fn default_label() -> String {
    "address".to_string()
}

fn default_value_selector() -> String {
    "dd.monospace".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of owners listed in the summary.
    #[serde(default = "default_top_owners")]
    pub top_owners: usize,

    /// Full detail report file name.
    #[serde(default = "default_owners_file")]
    pub owners_file: String,

    /// Statistics report file name.
    #[serde(default = "default_statistics_file")]
    pub statistics_file: String,

    /// Condensed `address,count` file name.
    #[serde(default = "default_counts_file")]
    pub counts_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_owners: default_top_owners(),
            owners_file: default_owners_file(),
            statistics_file: default_statistics_file(),
            counts_file: default_counts_file(),
        }
    }
}

fn default_top_owners() -> usize {
    10
}

fn default_owners_file() -> String {
    "bat_owners.json".to_string()
}

fn default_statistics_file() -> String {
    "bat_ownership_statistics.json".to_string()
}

fn default_counts_file() -> String {
    "bat_ownership_counts.json".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref prefix) = args.prefix {
            self.scanner.prefix = prefix.clone();
        }
        if let Some(ref suffix) = args.suffix {
            self.scanner.suffix = suffix.clone();
        }
        if let Some(ref label) = args.label {
            self.extract.label = label.clone();
        }
        if let Some(top) = args.top {
            self.report.top_owners = top;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
