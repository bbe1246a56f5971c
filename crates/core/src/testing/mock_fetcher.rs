//! Mock URL fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ingest::UrlFetcher;
use crate::site::SiteError;

/// Serves fixed bytes per URL; unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct MockUrlFetcher {
    responses: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl MockUrlFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: &str, content: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), content);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlFetcher for MockUrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SiteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(url)
            .cloned()
            .ok_or(SiteError::Status(404))
    }
}
