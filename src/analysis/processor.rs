//! Directory processing.
//!
//! Runs discovery, per-document extraction and aggregation for one
//! directory. Documents are handled one at a time in scan order; a
//! failing document is logged and recorded but never stops the run.

use super::aggregator::{calculate_ownership_stats, owned_item_count, summarize};
use crate::error::OwnershipError;
use crate::extract::OwnerExtractor;
use crate::models::{ErrorRecord, ItemRecord, Ownership};
use crate::scanner::{DocumentScanner, ScannedDocument};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Options for a processing run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Owners listed in the summary.
    pub top_owners: usize,
    /// Log progress every this many documents.
    pub progress_interval: usize,
    /// Draw a progress bar.
    pub show_progress: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            top_owners: 10,
            progress_interval: 100,
            show_progress: false,
        }
    }
}

/// Processes a directory of inscription pages.
pub struct DirectoryProcessor {
    scanner: DocumentScanner,
    extractor: OwnerExtractor,
    options: ProcessOptions,
}

impl DirectoryProcessor {
    pub fn new(scanner: DocumentScanner, extractor: OwnerExtractor, options: ProcessOptions) -> Self {
        Self {
            scanner,
            extractor,
            options,
        }
    }

    /// Process every matching document and aggregate ownership.
    ///
    /// Only a directory access failure is returned as an error.
    pub async fn process(&self) -> Result<Ownership, OwnershipError> {
        let scan = self.scanner.scan()?;

        let mut errors: Vec<ErrorRecord> = scan
            .malformed
            .iter()
            .map(|e| ErrorRecord::new(e.file().unwrap_or_default(), e))
            .collect();

        info!(
            "Found {} HTML files to process in {}",
            scan.documents.len(),
            self.scanner.root().display()
        );

        let progress = self.progress_bar(scan.documents.len() as u64);
        let mut items = Vec::with_capacity(scan.documents.len());

        for doc in &scan.documents {
            let address = match self.read_owner(doc).await {
                Ok(address) => {
                    debug!("{} -> {:?}", doc.file_name, address);
                    address
                }
                Err(e) => {
                    warn!("Error processing {}: {}", doc.file_name, e);
                    errors.push(ErrorRecord::new(doc.file_name.clone(), &e));
                    None
                }
            };

            items.push(ItemRecord::new(doc.id.clone(), address));
            progress.inc(1);

            if self.options.progress_interval > 0 && items.len() % self.options.progress_interval == 0 {
                info!("Processed {} files...", items.len());
            }
        }

        progress.finish_and_clear();

        let owners = calculate_ownership_stats(&items);
        let summary = summarize(items.len(), &owners, self.options.top_owners);

        debug_assert_eq!(
            owners.iter().map(|o| o.count).sum::<usize>(),
            owned_item_count(&items)
        );
        debug_assert_eq!(summary.ownership_distribution.total(), summary.unique_owners);

        Ok(Ownership {
            items,
            errors,
            owners,
            summary,
        })
    }

    /// Read one document and extract its owner.
    async fn read_owner(&self, doc: &ScannedDocument) -> Result<Option<String>, OwnershipError> {
        let bytes = tokio::fs::read(&doc.path)
            .await
            .map_err(|e| OwnershipError::document(&doc.file_name, format!("failed to read file: {}", e)))?;

        let content = String::from_utf8(bytes).map_err(|e| {
            OwnershipError::document(&doc.file_name, format!("document is not valid UTF-8: {}", e))
        })?;

        self.extractor.parse_owner(&doc.file_name, &content)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
