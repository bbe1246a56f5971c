//! Mock torrent client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::torrent::{parse_torrent, MAX_META_VERSION};
use crate::torrent_client::{
    AddTorrentRequest, TorrentClient, TorrentClientError, TorrentFilters,
    TorrentInfo, TorrentSelection, TorrentState,
};

/// Mock implementation of the TorrentClient trait.
///
/// Provides controllable behavior for testing:
/// - Track added torrents for assertions
/// - Pre-populate listed torrents
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// let client = MockTorrentClient::new();
///
/// client.add_torrent(AddTorrentRequest::new(bytes, AddOption::default())).await?;
///
/// let added = client.added_torrents().await;
/// assert_eq!(added.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockTorrentClient {
    /// Recorded add_torrent calls.
    added: Arc<RwLock<Vec<AddTorrentRequest>>>,
    /// Torrents in the client by hash.
    torrents: Arc<RwLock<HashMap<String, TorrentInfo>>>,
    /// Recorded set_category calls.
    category_calls: Arc<RwLock<Vec<(TorrentSelection, String)>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<TorrentClientError>>>,
    /// Counter for generating hashes of unparseable data.
    hash_counter: Arc<RwLock<u32>>,
}

impl Default for MockTorrentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTorrentClient {
    /// Create a new mock torrent client.
    pub fn new() -> Self {
        Self {
            added: Arc::new(RwLock::new(Vec::new())),
            torrents: Arc::new(RwLock::new(HashMap::new())),
            category_calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            hash_counter: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all recorded add_torrent calls.
    pub async fn added_torrents(&self) -> Vec<AddTorrentRequest> {
        self.added.read().await.clone()
    }

    /// Get all recorded set_category calls.
    pub async fn category_calls(&self) -> Vec<(TorrentSelection, String)> {
        self.category_calls.read().await.clone()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: TorrentClientError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get a torrent by hash.
    pub async fn torrent(&self, hash: &str) -> Option<TorrentInfo> {
        self.torrents.read().await.get(hash).cloned()
    }

    /// Pre-populate a torrent (for testing list and category operations).
    pub async fn add_mock_torrent(&self, info: TorrentInfo) {
        self.torrents.write().await.insert(info.hash.clone(), info);
    }

    async fn take_error(&self) -> Option<TorrentClientError> {
        self.next_error.write().await.take()
    }

    async fn generate_hash(&self) -> String {
        let mut counter = self.hash_counter.write().await;
        *counter += 1;
        format!("mockhash{:08x}", *counter)
    }
}

#[async_trait]
impl TorrentClient for MockTorrentClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), TorrentClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.added.write().await.push(request.clone());

        let metadata = parse_torrent(&request.data, MAX_META_VERSION).ok();
        let hash = match &metadata {
            Some(m) => m.info_hash.clone(),
            None => self.generate_hash().await,
        };
        let name = if !request.options.rename_to.is_empty() {
            request.options.rename_to.clone()
        } else if let Some(m) = &metadata {
            m.content_path.clone()
        } else {
            request
                .filename
                .clone()
                .unwrap_or_else(|| format!("Mock Torrent {}", hash))
        };

        let info = TorrentInfo {
            hash: hash.clone(),
            name,
            state: if request.options.pause {
                TorrentState::Paused
            } else {
                TorrentState::Downloading
            },
            progress: 0.0,
            download_speed: 0,
            upload_speed: 0,
            category: Some(request.options.category.clone()).filter(|c| !c.is_empty()),
        };
        self.torrents.write().await.insert(hash, info);
        Ok(())
    }

    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let torrents = self.torrents.read().await;
        let mut result: Vec<TorrentInfo> = torrents
            .values()
            .filter(|t| {
                if let Some(state) = &filters.state {
                    if &t.state != state {
                        return false;
                    }
                }
                if let Some(category) = &filters.category {
                    if t.category.as_ref() != Some(category) {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        result.sort_by(|a, b| a.hash.cmp(&b.hash));

        Ok(result)
    }

    async fn set_category(
        &self,
        selection: &TorrentSelection,
        category: &str,
    ) -> Result<(), TorrentClientError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.category_calls
            .write()
            .await
            .push((selection.clone(), category.to_string()));

        let mut torrents = self.torrents.write().await;
        for torrent in torrents.values_mut() {
            let selected = match selection {
                TorrentSelection::All => true,
                TorrentSelection::Hashes(hashes) => hashes.contains(&torrent.hash),
            };
            if selected {
                torrent.category = Some(category.to_string()).filter(|c| !c.is_empty());
            }
        }
        Ok(())
    }
}
