//! Mock sites and site catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::site::{
    host_candidates, url_domain, DownloadedTorrent, Site, SiteCatalog, SiteError, SiteSettings,
};

/// A site serving torrents from memory, keyed by id or full URL.
#[derive(Debug, Clone)]
pub struct MockSite {
    name: String,
    settings: SiteSettings,
    torrents: HashMap<String, Vec<u8>>,
}

impl MockSite {
    pub fn new(name: impl Into<String>, settings: SiteSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            torrents: HashMap::new(),
        }
    }

    /// Serve `content` for `locator`.
    pub fn with_torrent(mut self, locator: impl Into<String>, content: Vec<u8>) -> Self {
        self.torrents.insert(locator.into(), content);
        self
    }
}

#[async_trait]
impl Site for MockSite {
    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> SiteSettings {
        self.settings
    }

    async fn download_torrent(&self, locator: &str) -> Result<DownloadedTorrent, SiteError> {
        let content = self
            .torrents
            .get(locator)
            .cloned()
            .ok_or(SiteError::Status(404))?;
        Ok(DownloadedTorrent {
            content,
            headers: vec![(
                "content-type".to_string(),
                "application/x-bittorrent".to_string(),
            )],
        })
    }
}

/// Mock implementation of the SiteCatalog trait.
///
/// Domain and tracker guesses are counted so tests can assert memoization.
/// Sites become creatable once any builder mentions them.
#[derive(Debug, Default)]
pub struct MockSiteCatalog {
    /// Web host → site.
    domains: HashMap<String, String>,
    /// Announce host → site.
    trackers: HashMap<String, String>,
    sites: HashMap<String, MockSite>,
    /// Sites whose creation fails even though they are known.
    broken: HashSet<String>,
    domain_guesses: AtomicUsize,
    tracker_guesses: AtomicUsize,
    created: Mutex<HashMap<String, usize>>,
}

impl MockSiteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn site_mut(&mut self, name: &str) -> &mut MockSite {
        self.sites
            .entry(name.to_string())
            .or_insert_with(|| MockSite::new(name, SiteSettings::default()))
    }

    pub fn with_domain(mut self, domain: &str, site: &str) -> Self {
        self.domains.insert(domain.to_string(), site.to_string());
        self.site_mut(site);
        self
    }

    pub fn with_tracker(mut self, host: &str, site: &str) -> Self {
        self.trackers.insert(host.to_string(), site.to_string());
        self.site_mut(site);
        self
    }

    /// Mark a site as enforcing hit-and-run globally.
    pub fn with_hnr(mut self, site: &str) -> Self {
        self.site_mut(site).settings.global_hnr = true;
        self
    }

    pub fn with_torrent(mut self, site: &str, locator: &str, content: Vec<u8>) -> Self {
        self.site_mut(site)
            .torrents
            .insert(locator.to_string(), content);
        self
    }

    /// Make creation of `site` fail.
    pub fn with_broken_site(mut self, site: &str) -> Self {
        self.site_mut(site);
        self.broken.insert(site.to_string());
        self
    }

    pub fn domain_guess_count(&self) -> usize {
        self.domain_guesses.load(Ordering::SeqCst)
    }

    pub fn tracker_guess_count(&self) -> usize {
        self.tracker_guesses.load(Ordering::SeqCst)
    }

    /// How many times `site` was instantiated.
    pub fn site_creation_count(&self, site: &str) -> usize {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(site)
            .copied()
            .unwrap_or(0)
    }

    fn lookup(map: &HashMap<String, String>, host: &str) -> Option<String> {
        host_candidates(host)
            .into_iter()
            .find_map(|candidate| map.get(candidate).cloned())
    }
}

impl SiteCatalog for MockSiteCatalog {
    fn guess_by_domain(&self, domain: &str, _default_site: &str) -> Result<String, SiteError> {
        self.domain_guesses.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.domains, domain).ok_or_else(|| SiteError::NotFound(domain.to_string()))
    }

    fn guess_by_trackers(
        &self,
        trackers: &[String],
        _default_site: &str,
    ) -> Result<String, SiteError> {
        self.tracker_guesses.fetch_add(1, Ordering::SeqCst);
        trackers
            .iter()
            .filter_map(|t| url_domain(t))
            .find_map(|host| Self::lookup(&self.trackers, &host))
            .ok_or_else(|| SiteError::NotFound(format!("{} tracker(s)", trackers.len())))
    }

    fn create_site(&self, name: &str) -> Result<Arc<dyn Site>, SiteError> {
        if self.broken.contains(name) {
            return Err(SiteError::Http("connection refused".to_string()));
        }
        let site = self
            .sites
            .get(name)
            .cloned()
            .ok_or_else(|| SiteError::UnknownSite(name.to_string()))?;
        *self
            .created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(name.to_string())
            .or_insert(0) += 1;
        Ok(Arc::new(site))
    }

    fn site_settings(&self, name: &str) -> Option<SiteSettings> {
        self.sites.get(name).map(|s| s.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_site_download() {
        let site = MockSite::new("alpha", SiteSettings::default()).with_torrent("1", b"d1:xe".to_vec());
        assert_eq!(site.download_torrent("1").await.unwrap().content, b"d1:xe");
        assert!(matches!(
            site.download_torrent("2").await,
            Err(SiteError::Status(404))
        ));
    }

    #[test]
    fn test_catalog_guesses_parent_domain() {
        let catalog = MockSiteCatalog::new().with_domain("alpha.example", "alpha");
        assert_eq!(catalog.guess_by_domain("www.alpha.example", "").unwrap(), "alpha");
        assert!(catalog.guess_by_domain("beta.example", "").is_err());
        assert_eq!(catalog.domain_guess_count(), 2);
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = MockSiteCatalog::new()
            .with_hnr("alpha")
            .with_broken_site("beta");
        let alpha = catalog.create_site("alpha").unwrap();
        assert!(alpha.settings().global_hnr);
        assert_eq!(catalog.site_creation_count("alpha"), 1);
        assert!(catalog.create_site("beta").is_err());
        assert!(matches!(
            catalog.create_site("gamma"),
            Err(SiteError::UnknownSite(_))
        ));
        assert_eq!(catalog.site_settings("gamma"), None);
    }
}
