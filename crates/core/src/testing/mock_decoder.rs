//! Mock torrent decoder for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::torrent::{TorrentDecoder, TorrentMetadata, TorrentParseError};

/// Decoder mapping exact byte strings to canned metadata.
#[derive(Debug, Default)]
pub struct MockDecoder {
    known: HashMap<Vec<u8>, TorrentMetadata>,
    calls: AtomicUsize,
    last_max_version: AtomicU32,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_torrent(mut self, bytes: &[u8], metadata: TorrentMetadata) -> Self {
        self.known.insert(bytes.to_vec(), metadata);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Version ceiling passed with the most recent call.
    pub fn last_max_version(&self) -> u32 {
        self.last_max_version.load(Ordering::SeqCst)
    }
}

impl TorrentDecoder for MockDecoder {
    fn decode(
        &self,
        bytes: &[u8],
        max_meta_version: u32,
    ) -> Result<TorrentMetadata, TorrentParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_max_version
            .store(max_meta_version, Ordering::SeqCst);
        self.known
            .get(bytes)
            .cloned()
            .ok_or_else(|| TorrentParseError::ParseError("unrecognized torrent".to_string()))
    }
}
