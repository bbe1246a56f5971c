//! Types for download client operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during download client operations.
#[derive(Debug, Error)]
pub enum TorrentClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Torrent rejected: {0}")]
    Rejected(String),

    #[error("Invalid torrent data: {0}")]
    InvalidTorrent(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// State of a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentState {
    /// Downloading from peers.
    Downloading,
    /// Seeding to peers.
    Seeding,
    /// Download or upload is paused.
    Paused,
    /// Checking file integrity.
    Checking,
    /// Queued for download.
    Queued,
    /// Stalled (no peers).
    Stalled,
    /// Error state.
    Error,
    /// Unknown state.
    Unknown,
}

impl TorrentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentState::Downloading => "downloading",
            TorrentState::Seeding => "seeding",
            TorrentState::Paused => "paused",
            TorrentState::Checking => "checking",
            TorrentState::Queued => "queued",
            TorrentState::Stalled => "stalled",
            TorrentState::Error => "error",
            TorrentState::Unknown => "unknown",
        }
    }
}

/// Information about a torrent already in the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentInfo {
    /// Info hash (lowercase hex).
    pub hash: String,
    /// Torrent name.
    pub name: String,
    /// Current state.
    pub state: TorrentState,
    /// Download progress (0.0 - 1.0).
    pub progress: f64,
    /// Current download speed in bytes/second.
    pub download_speed: u64,
    /// Current upload speed in bytes/second.
    pub upload_speed: u64,
    /// Category/label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TorrentInfo {
    /// Whether all pieces have been downloaded.
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Whether data is currently moving in either direction.
    pub fn is_active(&self) -> bool {
        self.download_speed > 0 || self.upload_speed > 0
    }
}

/// Options applied when a torrent is added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOption {
    /// Start paused.
    pub pause: bool,
    /// Download path override (empty = client default).
    pub save_path: String,
    /// Skip hash checking of existing data.
    pub skip_checking: bool,
    /// Download pieces in order. Ignored by backends without support.
    pub sequential_download: bool,
    /// Category/label (empty = none).
    pub category: String,
    /// Tags in display order.
    pub tags: Vec<String>,
    /// Rename the torrent in the client (empty = keep).
    pub rename_to: String,
}

/// Request to add a torrent from .torrent file contents.
#[derive(Debug, Clone)]
pub struct AddTorrentRequest {
    /// Raw .torrent file bytes.
    pub data: Vec<u8>,
    /// Original filename (for logging and multipart upload).
    pub filename: Option<String>,
    /// Add-time options.
    pub options: AddOption,
}

impl AddTorrentRequest {
    pub fn new(data: Vec<u8>, options: AddOption) -> Self {
        Self {
            data,
            filename: None,
            options,
        }
    }

    /// Set the upload filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Filters for listing torrents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TorrentFilters {
    /// Filter by state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<TorrentState>,
    /// Filter by category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TorrentFilters {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.category.is_none()
    }
}

/// Which torrents a bulk operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentSelection {
    /// Every torrent in the client.
    All,
    /// Torrents with these info hashes.
    Hashes(Vec<String>),
}

/// Trait for download client backends.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Add a torrent from file contents.
    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), TorrentClientError>;

    /// List torrents, optionally filtered.
    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError>;

    /// Set the category of the selected torrents.
    async fn set_category(
        &self,
        selection: &TorrentSelection,
        category: &str,
    ) -> Result<(), TorrentClientError>;
}
