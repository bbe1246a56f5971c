//! Torrent acquisition: site downloads, plain URLs, local files and stdin.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::site::{Site, SiteError};

use super::IngestError;

/// Suffix appended to local files once they are added.
pub const ADDED_SUFFIX: &str = ".added";

/// Suffixes marking files already handled by an earlier run.
pub const PROCESSED_SUFFIXES: [&str; 3] = [ADDED_SUFFIX, ".failed", ".downloaded"];

/// Local input meaning "read the torrent from stdin".
pub const STDIN_SENTINEL: &str = "-";

/// Whether a local file name carries a processed-suffix marker.
pub fn is_processed(path: &str) -> bool {
    PROCESSED_SUFFIXES.iter().any(|s| path.ends_with(s))
}

/// Fetches raw bytes from a plain URL, outside of any site.
#[async_trait]
pub trait UrlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SiteError>;
}

/// [`UrlFetcher`] over a shared reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UrlFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SiteError> {
        let response = self.client.get(url).send().await.map_err(|e| {
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

        Ok(response
            .bytes()
            .await
            .map_err(|e| SiteError::Http(e.to_string()))?
            .to_vec())
    }
}

/// Download through a site. Response headers are dropped.
pub async fn acquire_remote(site: &dyn Site, locator: &str) -> Result<Vec<u8>, IngestError> {
    let downloaded = site
        .download_torrent(locator)
        .await
        .map_err(|e| IngestError::Acquire(e.to_string()))?;
    debug!(
        site = site.name(),
        locator = locator,
        bytes = downloaded.content.len(),
        headers = downloaded.headers.len(),
        "Downloaded site torrent"
    );
    Ok(downloaded.content)
}

/// Fetch a plain torrent URL.
pub async fn acquire_url(fetcher: &dyn UrlFetcher, url: &str) -> Result<Vec<u8>, IngestError> {
    fetcher
        .fetch(url)
        .await
        .map_err(|e| IngestError::Acquire(e.to_string()))
}

/// Read a local file, or stdin for [`STDIN_SENTINEL`].
pub async fn acquire_local(path: &str) -> Result<Vec<u8>, IngestError> {
    let result = if path == STDIN_SENTINEL {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .map(|_| buf)
    } else {
        tokio::fs::read(Path::new(path)).await
    };
    result.map_err(|e| IngestError::Acquire(format!("failed to read file ({})", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteSettings;
    use crate::testing::{MockSite, MockUrlFetcher};
    use tempfile::TempDir;

    #[test]
    fn test_is_processed() {
        assert!(is_processed("a.torrent.added"));
        assert!(is_processed("dir/b.torrent.failed"));
        assert!(is_processed("c.torrent.downloaded"));
        assert!(!is_processed("a.torrent"));
        assert!(!is_processed("added.torrent"));
    }

    #[tokio::test]
    async fn test_acquire_local_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.torrent");
        std::fs::write(&path, b"d4:infode").unwrap();

        let bytes = acquire_local(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"d4:infode");
    }

    #[tokio::test]
    async fn test_acquire_local_missing_file() {
        let err = acquire_local("/nonexistent/x.torrent").await.unwrap_err();
        assert!(matches!(err, IngestError::Acquire(_)));
        assert!(err.to_string().contains("failed to read file"));
    }

    #[tokio::test]
    async fn test_acquire_remote() {
        let site = MockSite::new("alpha", SiteSettings::default()).with_torrent("1", b"d1:xe".to_vec());

        assert_eq!(acquire_remote(&site, "1").await.unwrap(), b"d1:xe");
        let err = acquire_remote(&site, "2").await.unwrap_err();
        assert!(matches!(err, IngestError::Acquire(_)));
    }

    #[tokio::test]
    async fn test_acquire_url() {
        let fetcher = MockUrlFetcher::new().with_url("https://cdn.example/a.torrent", b"d1:ye".to_vec());
        assert_eq!(
            acquire_url(&fetcher, "https://cdn.example/a.torrent").await.unwrap(),
            b"d1:ye"
        );
        assert!(acquire_url(&fetcher, "https://cdn.example/b.torrent").await.is_err());
    }
}
