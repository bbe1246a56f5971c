//! Types for torrent decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest `meta version` the pipeline accepts.
pub const MAX_META_VERSION: u32 = 99;

/// Errors that can occur when parsing torrent files.
#[derive(Debug, Error)]
pub enum TorrentParseError {
    #[error("Failed to parse torrent: {0}")]
    ParseError(String),

    #[error("Unsupported meta version {found} (max {max})")]
    UnsupportedVersion { found: u32, max: u32 },

    #[error("Empty torrent (no files)")]
    EmptyTorrent,
}

/// Canonical metadata extracted from a torrent file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentMetadata {
    /// Info hash (lowercase hex).
    pub info_hash: String,
    /// Root name of the content (file name or top-level folder).
    pub content_path: String,
    /// Total size of all files in bytes.
    pub total_size: u64,
    /// Announce URLs, `announce` first, deduplicated.
    pub trackers: Vec<String>,
}

/// Decodes raw torrent bytes into metadata.
pub trait TorrentDecoder: Send + Sync {
    fn decode(
        &self,
        bytes: &[u8],
        max_meta_version: u32,
    ) -> Result<TorrentMetadata, TorrentParseError>;
}
