//! Report generation.
//!
//! Produces the three report files from a processed directory and
//! writes them next to the scanned pages.

use crate::config::ReportConfig;
use crate::error::OwnershipError;
use crate::models::{Ownership, OwnersReport, StatisticsReport, Summary};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the written report files.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub owners: PathBuf,
    pub statistics: PathBuf,
    pub counts: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, config: &ReportConfig) -> Self {
        Self {
            owners: dir.join(&config.owners_file),
            statistics: dir.join(&config.statistics_file),
            counts: dir.join(&config.counts_file),
        }
    }
}

/// Generate the full detail report: processed count, errors, every item.
pub fn generate_owners_report(ownership: &Ownership) -> Result<String> {
    let report = OwnersReport {
        total_processed: ownership.items.len(),
        errors: &ownership.errors,
        owners: &ownership.items,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Generate the statistics report: summary plus every owner aggregate.
pub fn generate_statistics_report(ownership: &Ownership) -> Result<String> {
    let report = StatisticsReport {
        summary: &ownership.summary,
        ownership_stats: &ownership.owners,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Generate the condensed `address,count` listing.
///
/// Lines are joined with `\n` and there is no trailing newline.
pub fn generate_counts_report(ownership: &Ownership) -> String {
    ownership
        .owners
        .iter()
        .map(|owner| format!("{},{}", owner.address, owner.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write all three reports into `dir`.
///
/// Content is rendered up front; each file is then replaced atomically.
/// Every write runs to completion before the first failure is returned,
/// and no temp file outlives the call.
pub async fn write_reports(
    dir: &Path,
    config: &ReportConfig,
    ownership: &Ownership,
) -> Result<ReportPaths> {
    let paths = ReportPaths::new(dir, config);

    let owners = generate_owners_report(ownership)?;
    let statistics = generate_statistics_report(ownership)?;
    let counts = generate_counts_report(ownership);

    let results = tokio::join!(
        write_atomic(&paths.owners, &owners),
        write_atomic(&paths.statistics, &statistics),
        write_atomic(&paths.counts, &counts),
    );

    if let (Ok(()), Ok(()), Ok(())) = &results {
        return Ok(paths);
    }

    for path in [&paths.owners, &paths.statistics, &paths.counts] {
        let _ = tokio::fs::remove_file(tmp_path(path)).await;
    }
    results.0?;
    results.1?;
    results.2?;
    Ok(paths)
}

/// Hidden sibling used while `path` is being replaced.
fn tmp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// Write `content` to a hidden sibling file, then rename it over `path`.
pub async fn write_atomic(path: &Path, content: &str) -> Result<(), OwnershipError> {
    let tmp = tmp_path(path);

    let write_err = |source: std::io::Error| OwnershipError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Err(e) = tokio::fs::write(&tmp, content).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(e));
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(e));
    }

    debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

/// Human readable run summary for the console.
pub fn generate_console_summary(ownership: &Ownership) -> String {
    let summary: &Summary = &ownership.summary;
    let mut lines = Vec::new();

    lines.push(format!("Successfully processed: {} files", ownership.items.len()));
    lines.push(format!("Errors encountered: {} files", ownership.errors.len()));
    lines.push(String::new());
    lines.push(format!("Total Unique Owners: {}", summary.unique_owners));

    if !summary.top_owners.is_empty() {
        lines.push(String::new());
        lines.push(format!("Top {} Owners:", summary.top_owners.len()));
        for (i, owner) in summary.top_owners.iter().enumerate() {
            lines.push(format!("{}. Address: {}...", i + 1, abbreviate(&owner.address, 10)));
            lines.push(format!("   Owned: {} Doginals", owner.count));
        }
    }

    lines.push(String::new());
    lines.push("Ownership Distribution:".to_string());
    for (range, count) in summary.ownership_distribution.buckets() {
        lines.push(format!("{}: {} owners", range, count));
    }

    lines.join("\n")
}

/// First `n` characters of `s`.
fn abbreviate(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
