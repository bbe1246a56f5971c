//! Per-batch memoization of site guesses.

use std::collections::HashMap;

use tracing::warn;

use crate::site::SiteCatalog;

use super::IngestError;

/// Domain → site name memo for one batch.
///
/// An empty name records a failed guess; the guesser is not asked again for
/// that domain.
#[derive(Debug, Default)]
pub struct SiteResolverCache {
    domains: HashMap<String, String>,
}

impl SiteResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a domain, asking the catalog at most once per domain.
    pub fn resolve(&mut self, catalog: &dyn SiteCatalog, domain: &str, default_site: &str) -> String {
        if let Some(site) = self.domains.get(domain) {
            return site.clone();
        }

        let site = match catalog.guess_by_domain(domain, default_site) {
            Ok(site) => site,
            Err(e) => {
                warn!("{}", IngestError::site_resolution(domain, &e));
                String::new()
            }
        };
        self.domains.insert(domain.to_string(), site.clone());
        site
    }

    /// Resolve from a tracker list. Not memoized.
    pub fn resolve_by_trackers(
        catalog: &dyn SiteCatalog,
        source: &str,
        trackers: &[String],
        default_site: &str,
    ) -> String {
        match catalog.guess_by_trackers(trackers, default_site) {
            Ok(site) => site,
            Err(e) => {
                warn!("{}", IngestError::site_resolution(source, &e));
                String::new()
            }
        }
    }

    /// Number of distinct domains seen.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSiteCatalog;

    #[test]
    fn test_resolve_memoizes_hits() {
        let catalog = MockSiteCatalog::new().with_domain("alpha.example", "alpha");
        let mut cache = SiteResolverCache::new();

        assert_eq!(cache.resolve(&catalog, "alpha.example", ""), "alpha");
        assert_eq!(cache.resolve(&catalog, "alpha.example", ""), "alpha");
        assert_eq!(catalog.domain_guess_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_resolve_memoizes_misses() {
        let catalog = MockSiteCatalog::new();
        let mut cache = SiteResolverCache::new();

        assert_eq!(cache.resolve(&catalog, "unknown.example", "beta"), "");
        assert_eq!(cache.resolve(&catalog, "unknown.example", "beta"), "");
        assert_eq!(catalog.domain_guess_count(), 1);
    }

    #[test]
    fn test_one_guess_per_distinct_domain() {
        let catalog = MockSiteCatalog::new()
            .with_domain("alpha.example", "alpha")
            .with_domain("beta.example", "beta");
        let mut cache = SiteResolverCache::new();

        for domain in ["alpha.example", "beta.example", "alpha.example", "x.example", "beta.example"] {
            cache.resolve(&catalog, domain, "");
        }
        assert_eq!(catalog.domain_guess_count(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_resolve_by_trackers_is_not_cached() {
        let catalog = MockSiteCatalog::new().with_tracker("tracker.alpha.example", "alpha");
        let trackers = vec!["https://tracker.alpha.example/announce".to_string()];

        let a = SiteResolverCache::resolve_by_trackers(&catalog, "a.torrent", &trackers, "");
        let b = SiteResolverCache::resolve_by_trackers(&catalog, "b.torrent", &trackers, "");
        assert_eq!(a, "alpha");
        assert_eq!(b, "alpha");
        assert_eq!(catalog.tracker_guess_count(), 2);

        let none = SiteResolverCache::resolve_by_trackers(&catalog, "c.torrent", &[], "");
        assert_eq!(none, "");
    }
}
