//! Testing utilities and mock implementations.
//!
//! Mocks for every external seam of the ingest pipeline, so batches can be
//! run end to end without a download client, sites or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use ptingest_core::testing::{fixtures, MockSiteCatalog, MockTorrentClient};
//!
//! let client = Arc::new(MockTorrentClient::new());
//! let catalog = Arc::new(
//!     MockSiteCatalog::new()
//!         .with_domain("alpha.example", "alpha")
//!         .with_torrent("alpha", "1", fixtures::torrent_bytes("Movie", 1000, &[])),
//! );
//!
//! let executor = BatchExecutor::new(client.clone(), catalog, IngestOptions::default());
//! executor.run_remote(&["alpha.1".to_string()]).await?;
//! assert_eq!(client.added_torrents().await.len(), 1);
//! ```

mod mock_decoder;
mod mock_fetcher;
mod mock_site;
mod mock_torrent_client;

pub use mock_decoder::MockDecoder;
pub use mock_fetcher::MockUrlFetcher;
pub use mock_site::{MockSite, MockSiteCatalog};
pub use mock_torrent_client::MockTorrentClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::torrent_client::{TorrentInfo, TorrentState};

    const PIECE_LENGTH: u64 = 16384;

    fn bstr(out: &mut Vec<u8>, s: &[u8]) {
        out.extend_from_slice(s.len().to_string().as_bytes());
        out.push(b':');
        out.extend_from_slice(s);
    }

    fn bint(out: &mut Vec<u8>, i: u64) {
        out.push(b'i');
        out.extend_from_slice(i.to_string().as_bytes());
        out.push(b'e');
    }

    /// Bencode a single-file torrent.
    ///
    /// The first tracker becomes `announce`; with more than one tracker every
    /// tracker also gets its own `announce-list` tier. Identical arguments
    /// give identical bytes, so the info hash is stable.
    pub fn torrent_bytes(name: &str, size: u64, trackers: &[&str]) -> Vec<u8> {
        let pieces = size.div_ceil(PIECE_LENGTH).max(1) as usize;

        let mut out = Vec::new();
        out.push(b'd');
        if let Some(first) = trackers.first() {
            bstr(&mut out, b"announce");
            bstr(&mut out, first.as_bytes());
        }
        if trackers.len() > 1 {
            bstr(&mut out, b"announce-list");
            out.push(b'l');
            for tracker in trackers {
                out.push(b'l');
                bstr(&mut out, tracker.as_bytes());
                out.push(b'e');
            }
            out.push(b'e');
        }
        bstr(&mut out, b"info");
        out.push(b'd');
        bstr(&mut out, b"length");
        bint(&mut out, size);
        bstr(&mut out, b"name");
        bstr(&mut out, name.as_bytes());
        bstr(&mut out, b"piece length");
        bint(&mut out, PIECE_LENGTH);
        bstr(&mut out, b"pieces");
        bstr(&mut out, &vec![0u8; pieces * 20]);
        out.push(b'e');
        out.push(b'e');
        out
    }

    /// A torrent as listed by a download client.
    pub fn torrent_info(hash: &str, name: &str, state: TorrentState) -> TorrentInfo {
        TorrentInfo {
            hash: hash.to_string(),
            name: name.to_string(),
            state,
            progress: if state == TorrentState::Seeding { 1.0 } else { 0.5 },
            download_speed: 0,
            upload_speed: 0,
            category: None,
        }
    }
}
