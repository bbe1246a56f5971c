//! Config-backed site catalog.

use std::sync::Arc;

use tracing::debug;

use crate::config::SiteConfig;

use super::domain::{host_candidates, normalize_domain, url_domain};
use super::{HttpSite, Site, SiteCatalog, SiteError, SiteSettings};

/// A site plus the hosts it answers to.
#[derive(Debug, Clone)]
struct SiteEntry {
    config: SiteConfig,
    /// Web UI hosts (from `url` and `domains`).
    web_hosts: Vec<String>,
    /// Announce hosts (from `tracker_domains`).
    tracker_hosts: Vec<String>,
}

/// Site catalog built from `[[sites]]` configuration.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    entries: Vec<SiteEntry>,
}

impl SiteRegistry {
    pub fn new(sites: &[SiteConfig]) -> Self {
        let entries = sites
            .iter()
            .map(|config| {
                let web_hosts = std::iter::once(config.url.as_str())
                    .chain(config.domains.iter().map(String::as_str))
                    .filter_map(normalize_domain)
                    .collect();
                let tracker_hosts = config
                    .tracker_domains
                    .iter()
                    .filter_map(|d| normalize_domain(d))
                    .collect();
                SiteEntry {
                    config: config.clone(),
                    web_hosts,
                    tracker_hosts,
                }
            })
            .collect();
        Self { entries }
    }

    fn entry(&self, name: &str) -> Option<&SiteEntry> {
        self.entries.iter().find(|e| e.config.name == name)
    }

    /// Sites answering to `host`, trying the exact host before its parent.
    fn match_host(&self, host: &str, include_trackers: bool) -> Vec<&str> {
        let host = host.to_ascii_lowercase();
        for candidate in host_candidates(&host) {
            let matches: Vec<&str> = self
                .entries
                .iter()
                .filter(|e| {
                    e.web_hosts.iter().any(|h| h == candidate)
                        || (include_trackers && e.tracker_hosts.iter().any(|h| h == candidate))
                })
                .map(|e| e.config.name.as_str())
                .collect();
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }
}

/// Prefer the default site among several matches.
fn pick(matches: &[&str], default_site: &str) -> Option<String> {
    if !default_site.is_empty() && matches.contains(&default_site) {
        return Some(default_site.to_string());
    }
    matches.first().map(|s| s.to_string())
}

impl SiteCatalog for SiteRegistry {
    fn guess_by_domain(&self, domain: &str, default_site: &str) -> Result<String, SiteError> {
        let matches = self.match_host(domain, false);
        debug!(domain = domain, matches = ?matches, "Guessing site by domain");
        pick(&matches, default_site).ok_or_else(|| SiteError::NotFound(domain.to_string()))
    }

    fn guess_by_trackers(
        &self,
        trackers: &[String],
        default_site: &str,
    ) -> Result<String, SiteError> {
        for tracker in trackers {
            let Some(host) = url_domain(tracker) else {
                continue;
            };
            let matches = self.match_host(&host, true);
            if let Some(site) = pick(&matches, default_site) {
                debug!(tracker = %tracker, site = %site, "Matched site by tracker");
                return Ok(site);
            }
        }
        Err(SiteError::NotFound(format!("{} tracker(s)", trackers.len())))
    }

    fn create_site(&self, name: &str) -> Result<Arc<dyn Site>, SiteError> {
        let entry = self
            .entry(name)
            .ok_or_else(|| SiteError::UnknownSite(name.to_string()))?;
        Ok(Arc::new(HttpSite::new(entry.config.clone())?))
    }

    fn site_settings(&self, name: &str) -> Option<SiteSettings> {
        self.entry(name).map(|e| SiteSettings {
            global_hnr: e.config.global_hnr,
        })
    }
}
