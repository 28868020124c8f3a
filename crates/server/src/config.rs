use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::QueryResponse;

use crate::api::default_fixture;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub fixture_path: Option<String>,
    pub response_delay_ms: u64,
    pub failure_trigger: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            fixture_path: None,
            response_delay_ms: 0,
            failure_trigger: Some("#fail".into()),
        }
    }
}

impl Settings {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

pub fn load_settings() -> Settings {
    load_settings_with(Path::new("server.toml"), |key| std::env::var(key).ok())
}

pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
                    settings.server_bind = v.to_string();
                }
                if let Some(v) = file_cfg.get("fixture_path").and_then(toml::Value::as_str) {
                    settings.fixture_path = Some(v.to_string());
                }
                if let Some(v) = file_cfg
                    .get("response_delay_ms")
                    .and_then(toml::Value::as_integer)
                {
                    settings.response_delay_ms = v.max(0) as u64;
                }
                if let Some(v) = file_cfg.get("failure_trigger").and_then(toml::Value::as_str) {
                    settings.failure_trigger = Some(v.to_string()).filter(|t| !t.is_empty());
                }
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unparsable settings file")
            }
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__FIXTURE_PATH") {
        settings.fixture_path = Some(v).filter(|p| !p.trim().is_empty());
    }

    if let Some(v) = env("APP__RESPONSE_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.response_delay_ms = parsed;
        }
    }

    if let Some(v) = env("APP__FAILURE_TRIGGER") {
        settings.failure_trigger = Some(v).filter(|t| !t.is_empty());
    }

    settings
}

/// Reads the configured fixture, or falls back to the built-in sample.
pub fn load_fixture(settings: &Settings) -> anyhow::Result<QueryResponse> {
    let Some(path) = settings.fixture_path.as_deref() else {
        return Ok(default_fixture());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture file '{path}'"))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("fixture file '{path}' is not a valid query response"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
