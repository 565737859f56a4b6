//! Configuration management for HAQ

pub mod profile;
pub mod progress;
pub mod session;
pub mod storage;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::stats::ProgressStrategy;
use crate::theme::Theme;

/// Which backend the gateways talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// HTTP workflow backend and auth service
    #[default]
    Remote,
    /// Built-in question bank, nothing leaves the machine
    Offline,
}

/// Header layout drawn at the top of every screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderVariant {
    /// Title, user and key hints
    #[default]
    Full,
    /// Title only
    Minimal,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workflow backend base URL
    pub backend_url: String,

    /// Auth service base URL (defaults to the backend URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Remote or offline backend
    pub backend: BackendKind,

    /// Timeout for question and submission calls
    pub request_timeout_secs: u64,

    /// Timeout for sign-up, login and logout
    pub auth_timeout_secs: u64,

    /// Discard persisted sessions older than this (never, when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_max_age_hours: Option<u32>,

    /// Header layout
    pub header: HeaderVariant,

    /// How total program days are derived
    pub progress_strategy: ProgressStrategy,

    /// Selected theme name
    pub theme: String,

    /// Vim-style navigation keys
    pub vim_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5678/webhook".to_string(),
            auth_url: None,
            backend: BackendKind::Remote,
            request_timeout_secs: 30,
            auth_timeout_secs: 10,
            session_max_age_hours: None,
            header: HeaderVariant::Full,
            progress_strategy: ProgressStrategy::Extending,
            theme: "Tokyo Night".to_string(),
            vim_mode: true,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        Ok(config.with_env_overrides())
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Apply `HAQ_BACKEND_URL` and `HAQ_AUTH_URL` when set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("HAQ_BACKEND_URL").ok(),
            std::env::var("HAQ_AUTH_URL").ok(),
        )
    }

    /// Replace the backend and auth URLs when given
    pub fn with_overrides(mut self, backend_url: Option<String>, auth_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url;
        }
        if let Some(url) = auth_url.filter(|u| !u.trim().is_empty()) {
            self.auth_url = Some(url);
        }
        self
    }

    /// Base URL for sign-up, login and logout
    pub fn auth_base_url(&self) -> &str {
        self.auth_url.as_deref().unwrap_or(&self.backend_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "haq").context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "haq").context("Failed to determine data directory")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Get the log file path
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("haq.log"))
    }

    /// Get the active theme
    pub fn active_theme(&self) -> Theme {
        Theme::by_name(&self.theme).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_remote_backend() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.auth_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn auth_url_falls_back_to_backend() {
        let config = Config::default();
        assert_eq!(config.auth_base_url(), config.backend_url);

        let config = config.with_overrides(None, Some("https://auth.example.com".into()));
        assert_eq!(config.auth_base_url(), "https://auth.example.com");
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = Config::default().with_overrides(Some("  ".into()), None);
        assert_eq!(config.backend_url, Config::default().backend_url);
    }

    #[test]
    fn config_serializes_to_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"backend\":\"remote\""));
        assert!(json.contains("\"progress_strategy\":\"extending\""));
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let json = r#"{"backend":"offline","header":"minimal","session_max_age_hours":12}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.backend, BackendKind::Offline);
        assert_eq!(config.header, HeaderVariant::Minimal);
        assert_eq!(config.session_max_age_hours, Some(12));
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.vim_mode);
    }
}
