//! Error types for the ownership pipeline.
//!
//! Directory and output failures are fatal. Filename and document
//! failures are contained and end up in the error log of the detail report.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning, extracting and reporting.
#[derive(Debug, Error)]
pub enum OwnershipError {
    /// The target directory could not be listed or read.
    #[error("cannot read directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file matched the naming prefix and suffix but carries no usable number.
    #[error("malformed filename {file}: expected a numeric sequence token")]
    MalformedFilename { file: String },

    /// A document could not be read or parsed for the owner field.
    #[error("{reason}")]
    DocumentParse { file: String, reason: String },

    /// One of the report files could not be written.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured CSS selector does not parse.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

impl OwnershipError {
    /// Builds a document parse error for `file`.
    pub fn document(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DocumentParse {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// File the error refers to, for per-document errors.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::MalformedFilename { file } | Self::DocumentParse { file, .. } => Some(file),
            _ => None,
        }
    }
}
