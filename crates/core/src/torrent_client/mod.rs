//! Download client abstraction.
//!
//! This module provides a `TorrentClient` trait for handing parsed torrents
//! to download-client backends (qBittorrent, etc.).

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::*;

use std::sync::Arc;

use crate::config::{ClientBackend, ClientConfig};

/// Build the backend for a configured client.
pub fn create_client(
    config: &ClientConfig,
) -> Result<Arc<dyn TorrentClient>, TorrentClientError> {
    match config.backend {
        ClientBackend::QBittorrent => Ok(Arc::new(QBittorrentClient::new(config.clone())?)),
    }
}
