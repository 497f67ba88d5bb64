//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "BOOKSHELF_API_URL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// REST client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Backend settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides using the given lookup.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            log::debug!("Using API base URL from {}", API_URL_ENV);
            self.api.base_url = url;
        }
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.api.base_url()?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.server.host.trim().is_empty() {
            return Err(AppError::validation("server.host is empty"));
        }
        Ok(())
    }
}

/// REST client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the book API, e.g. `http://localhost:5000/api`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Parse the base URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())?;
        if url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "api.base_url cannot be used as a base: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Port to bind; 0 picks an ephemeral port
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// JSON snapshot of the collection; in-memory only when unset
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            data_file: None,
        }
    }
}

mod defaults {
    // Client defaults
    pub fn base_url() -> String {
        "http://localhost:5000/api".into()
    }
    pub fn user_agent() -> String {
        concat!("bookshelf/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Server defaults
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        5000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_base_url_is_local() {
        assert_eq!(Config::default().api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.api.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unparsable_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "mailto:someone@example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_base_url() {
        let config = Config::default().with_env(|key| {
            (key == API_URL_ENV).then(|| "http://books.test/api".to_string())
        });
        assert_eq!(config.api.base_url, "http://books.test/api");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let config = Config::default().with_env(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8080\ndata_file = \"books.json\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.data_file, Some(PathBuf::from("books.json")));
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("missing.toml"));
        assert_eq!(config.server.port, 5000);
    }
}
