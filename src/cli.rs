//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Batowners - ownership statistics for Doginal inscription pages
///
/// Scans a directory of downloaded inscription HTML pages, extracts the
/// owner address from each page and writes ownership reports next to them.
///
/// Examples:
///   batowners
///   batowners ./doginal_html --top 20
///   batowners ./megaphones --prefix Doginal_Megaphone_#
///   batowners ./doginal_html --dry-run
///   batowners --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory containing the downloaded HTML pages
    ///
    /// Reports are written into the same directory.
    #[arg(value_name = "DIR", default_value = "doginal_html", env = "BATOWNERS_DIR")]
    pub dir: PathBuf,

    /// Path to configuration file
    ///
    /// If not specified, looks for .batowners.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Filename prefix before the sequence number
    #[arg(long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Filename suffix after the sequence number
    #[arg(long, value_name = "TEXT")]
    pub suffix: Option<String>,

    /// Label text that precedes the owner address
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Number of top owners listed in the summary
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list the documents that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .batowners.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(top) = self.top {
            if top == 0 {
                return Err("Top owner count must be at least 1".to_string());
            }
        }

        if let Some(ref prefix) = self.prefix {
            if prefix.is_empty() {
                return Err("Prefix must not be empty".to_string());
            }
        }

        if let Some(ref label) = self.label {
            if label.trim().is_empty() {
                return Err("Label must not be blank".to_string());
            }
        }

        if !self.dir.exists() {
            return Err(format!("Directory does not exist: {}", self.dir.display()));
        }
        if !self.dir.is_dir() {
            return Err(format!("Path is not a directory: {}", self.dir.display()));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the merged `general.verbose` config key; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            dir: std::env::temp_dir(),
            config: None,
            prefix: None,
            suffix: None,
            label: None,
            top: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_dir() {
        let mut args = make_args();
        args.dir = PathBuf::from("/definitely/not/here/batowners");
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_top() {
        let mut args = make_args();
        args.top = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.dir = PathBuf::from("/definitely/not/here/batowners");
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_sets_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_from_argv() {
        let args = Args::try_parse_from(["batowners", "pages", "--top", "5", "--dry-run"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("pages"));
        assert_eq!(args.top, Some(5));
        assert!(args.dry_run);
    }
}
