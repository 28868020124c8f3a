use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Origin of the local development proxy, used when no base URL is set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(2200);
pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{raw}': {source}")]
    InvalidBaseUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("failed to parse settings file '{path}': {source}")]
    File {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub step_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            step_interval: DEFAULT_STEP_INTERVAL,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    step_interval_ms: Option<u64>,
}

/// Defaults, then `client.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ClientSettings, ConfigError> {
    load_settings_with(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientSettings, ConfigError> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw).map_err(|source| ConfigError::File {
            path: path.display().to_string(),
            source,
        })?;
        if let Some(v) = file_cfg.base_url {
            settings.base_url = v;
        }
        if let Some(v) = file_cfg.timeout_secs {
            settings.timeout = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.step_interval_ms {
            settings.step_interval = Duration::from_millis(v);
        }
    }

    if let Some(v) = env("QUERY_API_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("APP__TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.timeout = Duration::from_secs(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable APP__TIMEOUT_SECS"),
        }
    }
    if let Some(v) = env("APP__STEP_INTERVAL_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.step_interval = Duration::from_millis(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring unparsable APP__STEP_INTERVAL_MS"),
        }
    }

    settings.base_url = resolve_base_url(&settings.base_url)?;
    Ok(settings)
}

/// Normalises a configured base URL. Blank input means the dev proxy origin.
pub fn resolve_base_url(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_BASE_URL.to_string());
    }

    let parsed = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
