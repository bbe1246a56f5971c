//! HTTP site implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::config::SiteConfig;

use super::domain::is_url;
use super::{DownloadedTorrent, Site, SiteError, SiteSettings};

/// Downloads torrents from a site over HTTP using its URL template.
pub struct HttpSite {
    client: Client,
    config: SiteConfig,
}

impl HttpSite {
    pub fn new(config: SiteConfig) -> Result<Self, SiteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SiteError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Build the download URL for a locator.
    fn download_url(&self, locator: &str) -> String {
        if is_url(locator) {
            return locator.to_string();
        }
        render_download_url(&self.config, locator)
    }
}

/// Fill the site's download template.
fn render_download_url(config: &SiteConfig, id: &str) -> String {
    config
        .download_url
        .replace("{url}", config.url.trim_end_matches('/'))
        .replace("{id}", &urlencoding::encode(id))
        .replace("{passkey}", config.passkey.as_deref().unwrap_or(""))
}

#[async_trait]
impl Site for HttpSite {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn settings(&self) -> SiteSettings {
        SiteSettings {
            global_hnr: self.config.global_hnr,
        }
    }

    async fn download_torrent(&self, locator: &str) -> Result<DownloadedTorrent, SiteError> {
        let url = self.download_url(locator);
        debug!(site = %self.config.name, url = %url, "Downloading torrent");

        let mut request = self.client.get(&url);
        if let Some(cookie) = &self.config.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SiteError::Timeout
            } else {
                SiteError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status(status.as_u16()));
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let content = response
            .bytes()
            .await
            .map_err(|e| SiteError::Http(e.to_string()))?
            .to_vec();

        if content.first() != Some(&b'd') {
            let preview = String::from_utf8_lossy(&content[..content.len().min(80)]).into_owned();
            return Err(SiteError::InvalidContent(preview));
        }

        Ok(DownloadedTorrent { content, headers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(template: &str) -> SiteConfig {
        SiteConfig {
            name: "alpha".to_string(),
            url: "https://alpha.example/".to_string(),
            domains: vec![],
            tracker_domains: vec![],
            download_url: template.to_string(),
            cookie: Some("uid=1".to_string()),
            passkey: Some("pk".to_string()),
            global_hnr: true,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_render_download_url() {
        let cfg = config("{url}/download.php?id={id}&passkey={passkey}");
        assert_eq!(
            render_download_url(&cfg, "123"),
            "https://alpha.example/download.php?id=123&passkey=pk"
        );
        assert_eq!(
            render_download_url(&cfg, "a b"),
            "https://alpha.example/download.php?id=a%20b&passkey=pk"
        );
    }

    #[test]
    fn test_url_locator_is_used_verbatim() {
        let site = HttpSite::new(config("{url}/dl/{id}")).unwrap();
        assert_eq!(
            site.download_url("https://alpha.example/details.php?id=9"),
            "https://alpha.example/details.php?id=9"
        );
        assert_eq!(site.download_url("9"), "https://alpha.example/dl/9");
        assert!(site.settings().global_hnr);
    }
}
