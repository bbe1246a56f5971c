use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Client and site names are non-empty and unique
/// - Client URLs are set
/// - Timeouts are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for client in &config.clients {
        if client.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "clients.name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(client.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate client name: {}",
                client.name
            )));
        }
        if client.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "client {}: url cannot be empty",
                client.name
            )));
        }
        if client.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "client {}: timeout_secs cannot be 0",
                client.name
            )));
        }
    }

    let mut seen = HashSet::new();
    for site in &config.sites {
        if site.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "sites.name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(site.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate site name: {}",
                site.name
            )));
        }
        if site.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "site {}: timeout_secs cannot be 0",
                site.name
            )));
        }
    }

    Ok(())
}
