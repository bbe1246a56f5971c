//! Subcommand implementations.

pub mod add;
pub mod setcategory;

use std::sync::Arc;

use anyhow::{Context, Result};
use ptingest_core::{create_client, Config, TorrentClient};

/// Build the download client configured under `name`.
pub fn client_from_config(config: &Config, name: &str) -> Result<Arc<dyn TorrentClient>> {
    let client_config = config
        .client(name)
        .with_context(|| format!("client {} is not configured", name))?;
    create_client(client_config).with_context(|| format!("Failed to create client {}", name))
}
