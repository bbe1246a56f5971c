//! Per-item reports and batch totals.

use std::fmt;

use serde::Serialize;

use super::{BatchError, IngestError};

/// Pipeline stage an item had reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStage {
    Pending,
    Classified,
    SiteResolved,
    Acquired,
    Decoded,
    OptionBuilt,
    Submitted,
}

impl ItemStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStage::Pending => "pending",
            ItemStage::Classified => "classified",
            ItemStage::SiteResolved => "site_resolved",
            ItemStage::Acquired => "acquired",
            ItemStage::Decoded => "decoded",
            ItemStage::OptionBuilt => "option_built",
            ItemStage::Submitted => "submitted",
        }
    }
}

/// Terminal state of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemResult {
    Added {
        info_hash: String,
        content_path: String,
    },
    Failed {
        /// Last stage completed before the failure.
        stage: ItemStage,
        error: IngestError,
        /// Known once the torrent was decoded.
        content_path: Option<String>,
    },
}

/// Outcome of one batch item, emitted as soon as the item finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// 1-based index and batch size, for local batches.
    pub position: Option<(usize, usize)>,
    /// Resolved site, if any.
    pub site: Option<String>,
    pub locator: String,
    pub result: ItemResult,
}

impl ItemReport {
    pub fn is_success(&self) -> bool {
        matches!(self.result, ItemResult::Added { .. })
    }

    pub fn error(&self) -> Option<&IngestError> {
        match &self.result {
            ItemResult::Failed { error, .. } => Some(error),
            ItemResult::Added { .. } => None,
        }
    }
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let site = self.site.as_deref().unwrap_or("");
        match (&self.result, self.position) {
            (
                ItemResult::Added {
                    info_hash,
                    content_path,
                },
                Some((i, n)),
            ) => write!(
                f,
                "✓torrent ({}/{}) {}: added to client (site={}, infoHash={}) // {}",
                i, n, self.locator, site, info_hash, content_path
            ),
            (
                ItemResult::Added {
                    info_hash,
                    content_path,
                },
                None,
            ) => write!(
                f,
                "✓add site {} torrent {} success. infoHash={} // {}",
                site, self.locator, info_hash, content_path
            ),
            (
                ItemResult::Failed {
                    error,
                    content_path,
                    ..
                },
                position,
            ) => {
                match position {
                    Some((i, n)) => write!(f, "✕torrent ({}/{}) {}: {}", i, n, self.locator, error)?,
                    None if site.is_empty() => write!(f, "✕torrent {}: {}", self.locator, error)?,
                    None => write!(f, "✕add site {} torrent {} error: {}", site, self.locator, error)?,
                }
                if let Some(path) = content_path {
                    write!(f, " // {}", path)?;
                }
                Ok(())
            }
        }
    }
}

/// Batch totals. Counters only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Items processed (skipped files excluded).
    pub items_total: u64,
    pub items_added: u64,
    pub items_failed: u64,
    /// Local files skipped for carrying a processed suffix.
    pub items_skipped: u64,
    pub bytes_added: u64,
}

impl BatchOutcome {
    pub(crate) fn record(&mut self, report: &ItemReport, size: u64) {
        self.items_total += 1;
        if report.is_success() {
            self.items_added += 1;
            self.bytes_added += size;
        } else {
            self.items_failed += 1;
        }
    }

    pub(crate) fn record_skipped(&mut self) {
        self.items_skipped += 1;
    }

    /// `Err(ItemsFailed)` when any item failed.
    pub fn ensure_success(&self) -> Result<(), BatchError> {
        if self.items_failed > 0 {
            Err(BatchError::ItemsFailed(self.items_failed))
        } else {
            Ok(())
        }
    }

    /// Final summary line.
    pub fn summary_line(&self) -> String {
        format!(
            "Done. Added torrent (Size/Cnt): {} / {}; ErrorCnt: {}",
            format_bytes(self.bytes_added),
            self.items_added,
            self.items_failed
        )
    }
}

/// Human readable size in binary units.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", value, UNITS[unit])
}
