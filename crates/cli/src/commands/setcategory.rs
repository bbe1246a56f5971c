//! `setcategory`: change the category of torrents already in a client.

use anyhow::{bail, Result};
use tracing::{debug, info};

use ptingest_core::torrent_client::{
    TorrentClient, TorrentFilters, TorrentInfo, TorrentSelection, TorrentState,
};

/// Target selecting torrents by state rather than by hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    All,
    Active,
    Done,
    Downloading,
    Seeding,
    Paused,
    Error,
}

impl StateFilter {
    /// Parse a `_`-prefixed filter. `None` for plain hashes.
    pub fn parse(target: &str) -> Result<Option<Self>> {
        let Some(name) = target.strip_prefix('_') else {
            return Ok(None);
        };
        let filter = match name {
            "all" => StateFilter::All,
            "active" => StateFilter::Active,
            "done" | "completed" => StateFilter::Done,
            "downloading" => StateFilter::Downloading,
            "seeding" => StateFilter::Seeding,
            "paused" => StateFilter::Paused,
            "error" => StateFilter::Error,
            _ => bail!("unknown state filter {}", target),
        };
        Ok(Some(filter))
    }

    pub fn matches(&self, torrent: &TorrentInfo) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Active => torrent.is_active(),
            StateFilter::Done => torrent.is_complete(),
            StateFilter::Downloading => torrent.state == TorrentState::Downloading,
            StateFilter::Seeding => torrent.state == TorrentState::Seeding,
            StateFilter::Paused => torrent.state == TorrentState::Paused,
            StateFilter::Error => torrent.state == TorrentState::Error,
        }
    }
}

fn push_unique(hashes: &mut Vec<String>, hash: String) {
    if !hashes.contains(&hash) {
        hashes.push(hash);
    }
}

/// Resolve targets into a selection. Hashes keep their first-seen order.
pub async fn resolve_selection(
    client: &dyn TorrentClient,
    targets: &[String],
) -> Result<TorrentSelection> {
    let parsed = targets
        .iter()
        .map(|t| Ok((t, StateFilter::parse(t)?)))
        .collect::<Result<Vec<_>>>()?;
    if parsed.iter().any(|(_, f)| *f == Some(StateFilter::All)) {
        return Ok(TorrentSelection::All);
    }

    let listed = if parsed.iter().any(|(_, f)| f.is_some()) {
        client.list_torrents(&TorrentFilters::default()).await?
    } else {
        Vec::new()
    };

    let mut hashes = Vec::new();
    for (target, filter) in &parsed {
        match filter {
            Some(filter) => {
                for torrent in listed.iter().filter(|t| filter.matches(t)) {
                    debug!(
                        hash = %torrent.hash,
                        name = %torrent.name,
                        target = %target,
                        "Torrent selected"
                    );
                    push_unique(&mut hashes, torrent.hash.clone());
                }
            }
            None => push_unique(&mut hashes, target.to_ascii_lowercase()),
        }
    }

    Ok(TorrentSelection::Hashes(hashes))
}

/// Set `category` on every targeted torrent. Returns how many were targeted
/// (`None` for all).
pub async fn run(
    client: &dyn TorrentClient,
    category: &str,
    targets: &[String],
) -> Result<Option<usize>> {
    let selection = resolve_selection(client, targets).await?;
    let count = match &selection {
        TorrentSelection::All => None,
        TorrentSelection::Hashes(hashes) if hashes.is_empty() => {
            info!("No torrents matched");
            return Ok(Some(0));
        }
        TorrentSelection::Hashes(hashes) => Some(hashes.len()),
    };

    client.set_category(&selection, category).await?;
    info!(client = client.name(), category = category, torrents = ?count, "Category set");
    Ok(count)
}
