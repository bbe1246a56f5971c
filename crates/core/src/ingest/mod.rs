//! Torrent ingest pipeline.
//!
//! A batch of raw inputs (site ids, site URLs, local files, stdin or plain
//! torrent URLs) flows through:
//!
//! 1. classification into a [`ResolvedSource`]
//! 2. site resolution, memoized per domain by [`SiteResolverCache`]
//! 3. acquisition of the torrent bytes
//! 4. decoding into [`TorrentMetadata`](crate::torrent::TorrentMetadata)
//! 5. option synthesis (category, tags, flags)
//! 6. submission to the download client
//!
//! [`BatchExecutor`] drives the stages, emits one [`ItemReport`] per item and
//! returns the [`BatchOutcome`] totals.

mod acquirer;
mod classifier;
mod error;
mod executor;
mod options;
mod report;
mod resolver;
mod synthesizer;

pub use acquirer::{
    acquire_local, acquire_remote, acquire_url, is_processed, HttpFetcher, UrlFetcher,
    ADDED_SUFFIX, PROCESSED_SUFFIXES, STDIN_SENTINEL,
};
pub use classifier::{classify, classify_local, ResolvedSource, SourceKind};
pub use error::{BatchError, IngestError};
pub use executor::{BatchExecutor, ReportCallback};
pub use options::{IngestMode, IngestOptions, Profile};
pub use report::{format_bytes, BatchOutcome, ItemReport, ItemResult, ItemStage};
pub use resolver::SiteResolverCache;
pub use synthesizer::{category_for, synthesize, tags_for, FALLBACK_CATEGORY};
