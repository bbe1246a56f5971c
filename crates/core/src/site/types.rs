//! Types for the site catalog.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Prefix of the tag that records a torrent's origin site.
pub const SITE_TAG_PREFIX: &str = "site:";

/// Tag applied to torrents from sites with a global hit-and-run policy.
pub const HNR_TAG: &str = "_hr";

/// Errors that can occur during site operations.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no matching site for {0}")]
    NotFound(String),

    #[error("site {0} is not configured")]
    UnknownSite(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("response is not a torrent: {0}")]
    InvalidContent(String),

    #[error("Request timeout")]
    Timeout,
}

/// Per-site policy flags the pipeline reads at add time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteSettings {
    /// Every torrent on the site carries hit-and-run rules.
    pub global_hnr: bool,
}

/// A downloaded torrent file plus the response headers that came with it.
#[derive(Debug, Clone, Default)]
pub struct DownloadedTorrent {
    pub content: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

/// A configured site able to serve torrent files.
#[async_trait]
pub trait Site: Send + Sync {
    fn name(&self) -> &str;

    fn settings(&self) -> SiteSettings;

    /// Download a torrent by site-local id or by URL.
    async fn download_torrent(&self, locator: &str) -> Result<DownloadedTorrent, SiteError>;
}

/// Lookup and construction of sites.
pub trait SiteCatalog: Send + Sync {
    /// Guess the site serving `domain`. `default_site` breaks ties.
    fn guess_by_domain(&self, domain: &str, default_site: &str) -> Result<String, SiteError>;

    /// Guess the site a torrent belongs to from its announce URLs.
    fn guess_by_trackers(
        &self,
        trackers: &[String],
        default_site: &str,
    ) -> Result<String, SiteError>;

    fn create_site(&self, name: &str) -> Result<Arc<dyn Site>, SiteError>;

    /// Policy flags for a site, `None` when the site is not configured.
    fn site_settings(&self, name: &str) -> Option<SiteSettings>;
}

/// Tag recording which site a torrent came from.
pub fn site_tag(site: &str) -> String {
    format!("{}{}", SITE_TAG_PREFIX, site)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_tag() {
        assert_eq!(site_tag("alpha"), "site:alpha");
        assert_eq!(site_tag("alpha"), site_tag("alpha"));
    }

    #[test]
    fn test_site_error_display() {
        assert_eq!(
            SiteError::NotFound("x.example".into()).to_string(),
            "no matching site for x.example"
        );
        assert_eq!(SiteError::Status(404).to_string(), "HTTP status 404");
    }
}
