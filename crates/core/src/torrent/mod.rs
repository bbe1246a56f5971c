//! Torrent container decoding.
//!
//! Turns raw `.torrent` bytes into the [`TorrentMetadata`] record the ingest
//! pipeline works with. The byte-level grammar is handled by librqbit-core.

mod parser;
mod types;

pub use parser::{parse_torrent, LibrqbitDecoder};
pub use types::*;
