use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

impl Config {
    /// Look up a download client by its configured name.
    pub fn client(&self, name: &str) -> Option<&ClientConfig> {
        self.clients.iter().find(|c| c.name == name)
    }
}

/// Available download client backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClientBackend {
    #[serde(rename = "qbittorrent")]
    QBittorrent,
    // Future: Transmission
}

/// Download client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Name used on the command line to pick this client.
    pub name: String,
    /// Backend type.
    #[serde(rename = "type")]
    pub backend: ClientBackend,
    /// Web UI URL (e.g., "http://localhost:8080")
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Site (tracker community) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub name: String,
    /// Base URL of the site web UI.
    pub url: String,
    /// Extra web domains the site is reachable under.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Domains that appear in the site's announce URLs.
    #[serde(default)]
    pub tracker_domains: Vec<String>,
    /// Download URL template. Placeholders: `{url}`, `{id}`, `{passkey}`.
    #[serde(default = "default_download_url")]
    pub download_url: String,
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default)]
    pub passkey: Option<String>,
    /// Every torrent on the site is subject to hit-and-run rules.
    #[serde(default)]
    pub global_hnr: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

fn default_download_url() -> String {
    "{url}/download.php?id={id}".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.clients.is_empty());
        assert!(config.sites.is_empty());
    }

    #[test]
    fn test_deserialize_client_defaults() {
        let toml = r#"
[[clients]]
name = "local"
type = "qbittorrent"
url = "http://localhost:8080"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let client = config.client("local").unwrap();
        assert_eq!(client.backend, ClientBackend::QBittorrent);
        assert_eq!(client.timeout_secs, 30);
        assert!(client.username.is_empty());
        assert!(config.client("other").is_none());
    }

    #[test]
    fn test_deserialize_site_defaults() {
        let toml = r#"
[[sites]]
name = "alpha"
url = "https://alpha.example"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let site = &config.sites[0];
        assert_eq!(site.name, "alpha");
        assert_eq!(site.download_url, "{url}/download.php?id={id}");
        assert!(!site.global_hnr);
        assert!(site.domains.is_empty());
        assert!(site.cookie.is_none());
    }

    #[test]
    fn test_deserialize_full_site() {
        let toml = r#"
[[sites]]
name = "beta"
url = "https://www.beta.example"
domains = ["beta.example", "beta-mirror.example"]
tracker_domains = ["tracker.beta.example"]
download_url = "{url}/dl/{id}?passkey={passkey}"
cookie = "uid=1; pass=abc"
passkey = "deadbeef"
global_hnr = true
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let site = &config.sites[0];
        assert_eq!(site.domains.len(), 2);
        assert_eq!(site.tracker_domains, vec!["tracker.beta.example"]);
        assert_eq!(site.passkey.as_deref(), Some("deadbeef"));
        assert!(site.global_hnr);
        assert_eq!(site.timeout_secs, 10);
    }
}
