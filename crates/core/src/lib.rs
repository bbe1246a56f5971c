pub mod config;
pub mod ingest;
pub mod site;
pub mod testing;
pub mod torrent;
pub mod torrent_client;

pub use config::{
    load_config, load_config_from_str, validate_config, ClientBackend, ClientConfig, Config,
    ConfigError, SiteConfig,
};
pub use ingest::{
    BatchError, BatchExecutor, BatchOutcome, IngestError, IngestMode, IngestOptions, ItemReport,
    Profile,
};
pub use site::{SiteCatalog, SiteError, SiteRegistry};
pub use torrent::{LibrqbitDecoder, TorrentDecoder, TorrentMetadata, TorrentParseError};
pub use torrent_client::{create_client, TorrentClient, TorrentClientError};
