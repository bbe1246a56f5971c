//! qBittorrent download client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::ClientConfig;

use super::{
    AddOption, AddTorrentRequest, TorrentClient, TorrentClientError,
    TorrentFilters, TorrentInfo, TorrentSelection, TorrentState,
};

/// qBittorrent client (Web API v2).
///
/// The session cookie lives in reqwest's cookie jar. `logged_in` only records
/// whether a login succeeded since the last 403.
pub struct QBittorrentClient {
    http: Client,
    config: ClientConfig,
    logged_in: RwLock<bool>,
}

impl QBittorrentClient {
    pub fn new(config: ClientConfig) -> Result<Self, TorrentClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| {
                TorrentClientError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            config,
            logged_in: RwLock::new(false),
        })
    }

    /// Full URL of a Web API method, e.g. `torrents/add`.
    fn endpoint(&self, method: &str) -> String {
        format!("{}/api/v2/{}", self.config.url.trim_end_matches('/'), method)
    }

    async fn login(&self) -> Result<(), TorrentClientError> {
        let response = self
            .http
            .post(self.endpoint("auth/login"))
            .form(&[
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match body.trim() {
            "Ok." => {
                debug!(client = %self.config.name, "qBittorrent login successful");
                *self.logged_in.write().await = true;
                Ok(())
            }
            "Fails." => Err(TorrentClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            )),
            _ if status == StatusCode::FORBIDDEN => Err(TorrentClientError::AuthenticationFailed(
                "IP banned after too many failed logins".to_string(),
            )),
            other => Err(TorrentClientError::AuthenticationFailed(format!(
                "Unexpected response ({}): {}",
                status,
                other.chars().take(100).collect::<String>()
            ))),
        }
    }

    /// Send the request built by `build` and return the response body.
    ///
    /// Logs in first if needed. A 403 drops the session, logs in again and
    /// rebuilds the request once.
    async fn send<F>(&self, build: F) -> Result<String, TorrentClientError>
    where
        F: Fn(&Client) -> Result<RequestBuilder, TorrentClientError>,
    {
        if !*self.logged_in.read().await {
            self.login().await?;
        }

        let mut response = build(&self.http)?
            .send()
            .await
            .map_err(map_request_error)?;

        if response.status() == StatusCode::FORBIDDEN {
            warn!(client = %self.config.name, "qBittorrent session expired, re-authenticating");
            *self.logged_in.write().await = false;
            self.login().await?;
            response = build(&self.http)?
                .send()
                .await
                .map_err(map_request_error)?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TorrentClientError::ApiError(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| TorrentClientError::ApiError(e.to_string()))
    }
}

fn map_request_error(e: reqwest::Error) -> TorrentClientError {
    if e.is_timeout() {
        TorrentClientError::Timeout
    } else if e.is_connect() {
        TorrentClientError::ConnectionFailed(e.to_string())
    } else {
        TorrentClientError::ApiError(e.to_string())
    }
}

/// Form fields for `torrents/add`, in the order they are sent.
fn add_form_fields(options: &AddOption) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if !options.save_path.is_empty() {
        fields.push(("savepath", options.save_path.clone()));
    }
    if !options.category.is_empty() {
        fields.push(("category", options.category.clone()));
    }
    if !options.tags.is_empty() {
        fields.push(("tags", options.tags.join(",")));
    }
    if options.skip_checking {
        fields.push(("skip_checking", "true".to_string()));
    }
    if options.pause {
        // qBittorrent 5 renamed "paused" to "stopped"
        fields.push(("paused", "true".to_string()));
        fields.push(("stopped", "true".to_string()));
    }
    if options.sequential_download {
        fields.push(("sequentialDownload", "true".to_string()));
    }
    if !options.rename_to.is_empty() {
        fields.push(("rename", options.rename_to.clone()));
    }
    fields
}

/// Multipart body for `torrents/add`.
fn add_form(
    data: &[u8],
    filename: &str,
    options: &AddOption,
) -> Result<multipart::Form, TorrentClientError> {
    let file_part = multipart::Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_str("application/x-bittorrent")
        .map_err(|e| TorrentClientError::InvalidTorrent(e.to_string()))?;

    let mut form = multipart::Form::new().part("torrents", file_part);
    for (key, value) in add_form_fields(options) {
        form = form.text(key, value);
    }
    Ok(form)
}

/// qBittorrent torrent info response.
#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
    name: String,
    state: String,
    progress: f64,
    dlspeed: i64,
    upspeed: i64,
    category: String,
}

impl QBTorrentInfo {
    fn into_torrent_info(self) -> TorrentInfo {
        TorrentInfo {
            hash: self.hash.to_lowercase(),
            name: self.name,
            state: parse_qb_state(&self.state),
            progress: self.progress,
            download_speed: self.dlspeed.max(0) as u64,
            upload_speed: self.upspeed.max(0) as u64,
            category: if self.category.is_empty() {
                None
            } else {
                Some(self.category)
            },
        }
    }
}

/// Parse qBittorrent state string to TorrentState.
fn parse_qb_state(state: &str) -> TorrentState {
    match state {
        "downloading" | "forcedDL" | "metaDL" | "allocating" => TorrentState::Downloading,
        "uploading" | "forcedUP" => TorrentState::Seeding,
        "pausedDL" | "pausedUP" | "stoppedDL" | "stoppedUP" => TorrentState::Paused,
        "checkingDL" | "checkingUP" | "checkingResumeData" | "moving" => TorrentState::Checking,
        "queuedDL" | "queuedUP" => TorrentState::Queued,
        "stalledDL" | "stalledUP" => TorrentState::Stalled,
        "error" | "missingFiles" => TorrentState::Error,
        _ => TorrentState::Unknown,
    }
}

/// `filter` query value for a state, `None` when the API has no such filter.
fn state_filter(state: TorrentState) -> Option<&'static str> {
    match state {
        TorrentState::Downloading => Some("downloading"),
        TorrentState::Seeding => Some("seeding"),
        TorrentState::Paused => Some("paused"),
        TorrentState::Stalled => Some("stalled"),
        TorrentState::Checking => Some("checking"),
        TorrentState::Error => Some("errored"),
        TorrentState::Queued | TorrentState::Unknown => None,
    }
}

#[async_trait]
impl TorrentClient for QBittorrentClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), TorrentClientError> {
        let filename = request
            .filename
            .as_deref()
            .unwrap_or("torrent.torrent");

        let body = self
            .send(|http| {
                let form = add_form(&request.data, filename, &request.options)?;
                Ok(http.post(self.endpoint("torrents/add")).multipart(form))
            })
            .await?;
        if body.trim() == "Fails." {
            return Err(TorrentClientError::Rejected(
                "qBittorrent refused the torrent (duplicate or invalid)".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_torrents(
        &self,
        filters: &TorrentFilters,
    ) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(filter) = filters.state.and_then(state_filter) {
            query.push(("filter", filter.to_string()));
        }
        if let Some(category) = &filters.category {
            query.push(("category", category.clone()));
        }

        let response = self
            .send(|http| Ok(http.get(self.endpoint("torrents/info")).query(&query)))
            .await?;
        let torrents: Vec<QBTorrentInfo> = serde_json::from_str(&response)
            .map_err(|e| TorrentClientError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(torrents.into_iter().map(|t| t.into_torrent_info()).collect())
    }

    async fn set_category(
        &self,
        selection: &TorrentSelection,
        category: &str,
    ) -> Result<(), TorrentClientError> {
        let hashes = match selection {
            TorrentSelection::All => "all".to_string(),
            TorrentSelection::Hashes(hashes) if hashes.is_empty() => return Ok(()),
            TorrentSelection::Hashes(hashes) => hashes
                .iter()
                .map(|h| h.to_lowercase())
                .collect::<Vec<_>>()
                .join("|"),
        };

        if !category.is_empty() {
            // 409 when the category already exists
            let created = self
                .send(|http| {
                    Ok(http
                        .post(self.endpoint("torrents/createCategory"))
                        .form(&[("category", category)]))
                })
                .await;
            if let Err(e) = created {
                debug!(category = category, error = %e, "createCategory failed");
            }
        }

        self.send(|http| {
            Ok(http
                .post(self.endpoint("torrents/setCategory"))
                .form(&[("hashes", hashes.as_str()), ("category", category)]))
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qb_state() {
        assert_eq!(parse_qb_state("downloading"), TorrentState::Downloading);
        assert_eq!(parse_qb_state("forcedUP"), TorrentState::Seeding);
        assert_eq!(parse_qb_state("stoppedDL"), TorrentState::Paused);
        assert_eq!(parse_qb_state("checkingResumeData"), TorrentState::Checking);
        assert_eq!(parse_qb_state("queuedUP"), TorrentState::Queued);
        assert_eq!(parse_qb_state("stalledDL"), TorrentState::Stalled);
        assert_eq!(parse_qb_state("missingFiles"), TorrentState::Error);
        assert_eq!(parse_qb_state("something_else"), TorrentState::Unknown);
    }

    #[test]
    fn test_add_form_fields_full() {
        let options = AddOption {
            pause: true,
            save_path: "/data/tv".to_string(),
            skip_checking: true,
            sequential_download: true,
            category: "alpha".to_string(),
            tags: vec!["site:alpha".to_string(), "_hr".to_string(), "x".to_string()],
            rename_to: "Renamed".to_string(),
        };
        let fields = add_form_fields(&options);
        let get = |k: &str| {
            fields
                .iter()
                .find(|(key, _)| *key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("savepath"), Some("/data/tv"));
        assert_eq!(get("category"), Some("alpha"));
        assert_eq!(get("tags"), Some("site:alpha,_hr,x"));
        assert_eq!(get("skip_checking"), Some("true"));
        assert_eq!(get("paused"), Some("true"));
        assert_eq!(get("stopped"), Some("true"));
        assert_eq!(get("sequentialDownload"), Some("true"));
        assert_eq!(get("rename"), Some("Renamed"));
    }

    #[test]
    fn test_add_form_fields_defaults_are_omitted() {
        assert!(add_form_fields(&AddOption::default()).is_empty());
    }

    #[test]
    fn test_qb_torrent_info_conversion() {
        let qb_info = QBTorrentInfo {
            hash: "ABC123".to_string(),
            name: "Test Torrent".to_string(),
            state: "uploading".to_string(),
            progress: 1.0,
            dlspeed: 0,
            upspeed: 1000,
            category: String::new(),
        };

        let info = qb_info.into_torrent_info();
        assert_eq!(info.hash, "abc123");
        assert_eq!(info.state, TorrentState::Seeding);
        assert_eq!(info.name, "Test Torrent");
        assert!(info.category.is_none());
        assert!(info.is_active());
    }

    #[test]
    fn test_new_client_uses_config_name() {
        let client = QBittorrentClient::new(ClientConfig {
            name: "seedbox".to_string(),
            backend: crate::config::ClientBackend::QBittorrent,
            url: "http://localhost:8080/".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.name(), "seedbox");
        assert_eq!(
            client.endpoint("torrents/add"),
            "http://localhost:8080/api/v2/torrents/add"
        );
    }

    #[test]
    fn test_state_filter() {
        assert_eq!(state_filter(TorrentState::Error), Some("errored"));
        assert_eq!(state_filter(TorrentState::Seeding), Some("seeding"));
        assert_eq!(state_filter(TorrentState::Queued), None);
    }

    #[test]
    fn test_add_form_builds() {
        let options = AddOption {
            category: "alpha".to_string(),
            ..Default::default()
        };
        assert!(add_form(b"d4:infode", "a.torrent", &options).is_ok());
    }
}
