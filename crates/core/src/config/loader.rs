//! Configuration loading: a TOML file overlaid with `PTINGEST_*` variables.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// File read when neither `--config` nor `PTINGEST_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ptingest.toml";

/// Prefix of environment overrides. Nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "PTINGEST_";

fn env_overlay() -> Env {
    // PTINGEST_CONFIG names the file, it is not a config key
    Env::prefixed(ENV_PREFIX).split("__").ignore(&["config"])
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load a config file, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }
    extract(Figment::from(Toml::file(path)).merge(env_overlay()))
}

/// Load configuration from a TOML string, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}
