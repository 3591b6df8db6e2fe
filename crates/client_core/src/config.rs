use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use shared::protocol::{RequestRegistry, DEFAULT_API_BASE_URL, DEFAULT_HTML_DIR};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "client.toml";

/// User preferences owned by the application controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub auto_close_notif: bool,
    pub notif_timer_ms: u64,
    pub typeset_math: bool,
    pub show_countdown: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_close_notif: true,
            notif_timer_ms: 5_000,
            typeset_math: true,
            show_countdown: true,
        }
    }
}

impl Settings {
    pub fn use_default() -> Self {
        Self::default()
    }

    pub fn notif_timer(&self) -> Duration {
        Duration::from_millis(self.notif_timer_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub html_dir: String,
    pub request_timeout_secs: u64,
    pub settings: Settings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            html_dir: DEFAULT_HTML_DIR.into(),
            request_timeout_secs: 10,
            settings: Settings::default(),
        }
    }
}

impl ClientConfig {
    pub fn registry(&self) -> RequestRegistry {
        RequestRegistry::new(&self.api_base_url, &self.html_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// File first, then `APP__*` environment variables on top.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ClientConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let mut config = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<ClientConfig>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ClientConfig::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__API_BASE_URL") {
        config.api_base_url = v;
    }
    if let Some(v) = lookup("APP__HTML_DIR") {
        config.html_dir = v;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            config.request_timeout_secs = parsed;
        }
    }
    if let Some(v) = lookup("APP__AUTO_CLOSE_NOTIF") {
        if let Ok(parsed) = v.parse::<bool>() {
            config.settings.auto_close_notif = parsed;
        }
    }
    if let Some(v) = lookup("APP__NOTIF_TIMER_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            config.settings.notif_timer_ms = parsed;
        }
    }
}

pub fn validate(config: &ClientConfig) -> anyhow::Result<()> {
    let url = Url::parse(&config.api_base_url)
        .with_context(|| format!("invalid api_base_url '{}'", config.api_base_url))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "api_base_url must use http or https, got '{}'",
            url.scheme()
        );
    }
    if config.html_dir.trim().is_empty() {
        bail!("html_dir must not be empty");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
