use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::TransportConfig;
use serde::Deserialize;
use shared::protocol::{ADVICE_PATH, BUILD_PATH};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "assistant.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub advice_path: String,
    pub build_path: String,
    pub request_timeout_secs: Option<u64>,
    pub open_site: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            advice_path: ADVICE_PATH.into(),
            build_path: BUILD_PATH.into(),
            request_timeout_secs: None,
            open_site: true,
        }
    }
}

impl Settings {
    pub fn transport_config(&self) -> anyhow::Result<TransportConfig> {
        let base_url = Url::parse(self.base_url.trim())
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        let mut config = TransportConfig::new(base_url);
        config.advice_path = self.advice_path.clone();
        config.build_path = self.build_path.clone();
        config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    base_url: Option<String>,
    advice_path: Option<String>,
    build_path: Option<String>,
    request_timeout_secs: Option<u64>,
    open_site: Option<bool>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicitly named file must exist; the default `assistant.toml` is
/// optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match explicit {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            apply_file_overrides(&mut settings, &raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file_overrides(&mut settings, &raw)
                    .with_context(|| format!("failed to parse {DEFAULT_CONFIG_FILE}"))?;
            }
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn apply_file_overrides(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file.advice_path {
        settings.advice_path = v;
    }
    if let Some(v) = file.build_path {
        settings.build_path = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file.open_site {
        settings.open_site = v;
    }
    Ok(())
}

pub fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("ASSISTANT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__ADVICE_PATH") {
        settings.advice_path = v;
    }
    if let Some(v) = lookup("APP__BUILD_PATH") {
        settings.build_path = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
    if let Some(v) = lookup("APP__OPEN_SITE") {
        match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => settings.open_site = true,
            "0" | "false" | "no" => settings.open_site = false,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
