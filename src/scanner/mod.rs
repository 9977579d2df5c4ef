//! Document scanner for discovering and ordering inscription pages.
//!
//! Pages are expected to be named `<prefix><digits><suffix>`, e.g.
//! `Doginal_Bat_#17.html`. Matching files are returned in ascending
//! numeric order, which is the scan order every later step relies on.

use crate::error::OwnershipError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for document discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Filename prefix before the sequence number.
    pub prefix: String,
    /// Filename suffix after the sequence number.
    pub suffix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::ScannerConfig::default())
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            suffix: config.suffix.clone(),
        }
    }
}

/// A discovered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedDocument {
    /// Item id, `#` followed by the digits from the filename.
    pub id: String,
    /// Numeric value of the digits, used for ordering.
    pub sequence: u64,
    /// Bare file name.
    pub file_name: String,
    /// Full path to the file.
    pub path: PathBuf,
}

/// Outcome of a directory scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Well-named documents in scan order.
    pub documents: Vec<ScannedDocument>,
    /// Entries that matched prefix and suffix but had no usable number.
    pub malformed: Vec<OwnershipError>,
}

/// Scanner over a single flat directory.
pub struct DocumentScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl DocumentScanner {
    /// Create a new document scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the directory and return matching documents in scan order.
    ///
    /// Malformed names are collected rather than aborting the scan.
    /// Failure to list the directory itself is fatal.
    pub fn scan(&self) -> Result<ScanResult, OwnershipError> {
        let metadata = std::fs::metadata(&self.root).map_err(|source| {
            OwnershipError::DirectoryAccess {
                path: self.root.clone(),
                source,
            }
        })?;

        if !metadata.is_dir() {
            return Err(OwnershipError::DirectoryAccess {
                path: self.root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
            });
        }

        let mut result = ScanResult::default();

        // Symlinks are not followed here, so a dangling link is listed
        // like any other entry and fails later when read.
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) => self.classify(entry.path(), &mut result),
                Err(e) if e.depth() == 0 || e.path() == Some(self.root.as_path()) => {
                    return Err(OwnershipError::DirectoryAccess {
                        path: self.root.clone(),
                        source: e.into(),
                    });
                }
                Err(e) => match e.path() {
                    Some(path) => {
                        warn!("Cannot stat {}: {}", path.display(), e);
                        let path = path.to_path_buf();
                        self.classify(&path, &mut result);
                    }
                    None => warn!("Skipping unreadable entry: {}", e),
                },
            }
        }

        // Numeric order; file name breaks ties like #01 vs #1
        result.documents.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });

        debug!(
            "Scanned {}: {} documents, {} malformed",
            self.root.display(),
            result.documents.len(),
            result.malformed.len()
        );

        Ok(result)
    }

    /// Sort one entry into documents or malformed names by its file name.
    ///
    /// Entries of any type are kept when the name matches; a directory or
    /// broken link then fails as a document read instead of vanishing.
    fn classify(&self, path: &Path, result: &mut ScanResult) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("Skipping non UTF-8 file name: {:?}", path.file_name());
            return;
        };

        match self.parse_sequence(name) {
            None => {}
            Some(Ok((token, sequence))) => result.documents.push(ScannedDocument {
                id: format!("#{}", token),
                sequence,
                file_name: name.to_string(),
                path: path.to_path_buf(),
            }),
            Some(Err(e)) => {
                warn!("{}", e);
                result.malformed.push(e);
            }
        }
    }

    /// Extract the digit token and its value from a file name.
    ///
    /// Returns `None` when the name does not follow the prefix/suffix
    /// convention at all.
    pub fn parse_sequence<'a>(
        &self,
        file_name: &'a str,
    ) -> Option<Result<(&'a str, u64), OwnershipError>> {
        let token = file_name
            .strip_prefix(self.config.prefix.as_str())?
            .strip_suffix(self.config.suffix.as_str())?;

        let malformed = || OwnershipError::MalformedFilename {
            file: file_name.to_string(),
        };

        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Some(Err(malformed()));
        }

        Some(token.parse::<u64>().map(|n| (token, n)).map_err(|_| malformed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scanner_for(dir: &TempDir) -> DocumentScanner {
        DocumentScanner::new(dir.path().to_path_buf(), ScanConfig::default())
    }

    #[test]
    fn test_parse_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = scanner_for(&temp_dir);

        let (token, n) = scanner.parse_sequence("Doginal_Bat_#42.html").unwrap().unwrap();
        assert_eq!(token, "42");
        assert_eq!(n, 42);

        assert!(scanner.parse_sequence("notes.txt").is_none());
        assert!(scanner.parse_sequence("Doginal_Bat_#4.htm").is_none());
        assert!(scanner.parse_sequence("Doginal_Bat_#.html").unwrap().is_err());
        assert!(scanner.parse_sequence("Doginal_Bat_#4a.html").unwrap().is_err());
        assert!(scanner
            .parse_sequence("Doginal_Bat_#99999999999999999999999.html")
            .unwrap()
            .is_err());
    }

    #[test]
    fn test_scan_orders_numerically() {
        let temp_dir = TempDir::new().unwrap();
        for n in [10, 2, 1, 33] {
            std::fs::write(
                temp_dir.path().join(format!("Doginal_Bat_#{}.html", n)),
                "<html></html>",
            )
            .unwrap();
        }

        let result = scanner_for(&temp_dir).scan().unwrap();
        let ids: Vec<_> = result.documents.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(ids, vec!["#1", "#2", "#10", "#33"]);
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn test_scan_filters_and_collects_malformed() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Doginal_Bat_#1.html"), "x").unwrap();
        std::fs::write(temp_dir.path().join("Doginal_Bat_#one.html"), "x").unwrap();
        std::fs::write(temp_dir.path().join("bat_owners.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("Other_#2.html"), "x").unwrap();
        std::fs::create_dir(temp_dir.path().join("Doginal_Bat_#3.html")).unwrap();
        std::fs::create_dir(temp_dir.path().join("pages")).unwrap();

        let result = scanner_for(&temp_dir).scan().unwrap();

        // A directory with a matching name is kept so its read failure is recorded
        let names: Vec<_> = result.documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["Doginal_Bat_#1.html", "Doginal_Bat_#3.html"]);
        assert_eq!(result.malformed.len(), 1);
        assert!(matches!(
            &result.malformed[0],
            OwnershipError::MalformedFilename { file } if file == "Doginal_Bat_#one.html"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_tolerates_dangling_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Doginal_Bat_#1.html"), "x").unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing-target"),
            temp_dir.path().join("unrelated.lnk"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("also-missing"),
            temp_dir.path().join("Doginal_Bat_#5.html"),
        )
        .unwrap();

        let result = scanner_for(&temp_dir).scan().unwrap();
        let ids: Vec<_> = result.documents.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(ids, vec!["#1", "#5"]);
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn test_scan_missing_directory() {
        let scanner = DocumentScanner::new(
            PathBuf::from("/definitely/not/here/batowners"),
            ScanConfig::default(),
        );
        assert!(matches!(
            scanner.scan(),
            Err(OwnershipError::DirectoryAccess { .. })
        ));
    }

    #[test]
    fn test_scan_custom_convention() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Prefix_#3.htm"), "x").unwrap();
        std::fs::write(temp_dir.path().join("Prefix_#1.htm"), "x").unwrap();

        let config = ScanConfig {
            prefix: "Prefix_#".to_string(),
            suffix: ".htm".to_string(),
        };
        let result = DocumentScanner::new(temp_dir.path().to_path_buf(), config)
            .scan()
            .unwrap();

        assert_eq!(result.documents[0].id, "#1");
        assert_eq!(result.documents[1].id, "#3");
    }
}
