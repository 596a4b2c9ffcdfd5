//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::client::LookupRoute;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Employee backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Roster view behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Initial rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<u32>,
    /// Quiet period before the search field fires a lookup.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Endpoint used by the immediate name query.
    #[serde(default = "default_query_lookup")]
    pub query_lookup: LookupRoute,
    /// Endpoint used by the debounced search field.
    #[serde(default = "default_search_lookup")]
    pub search_lookup: LookupRoute,
}

fn default_page_size() -> u32 {
    5
}

fn default_page_size_options() -> Vec<u32> {
    vec![5, 10, 25]
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_query_lookup() -> LookupRoute {
    LookupRoute::Users
}

fn default_search_lookup() -> LookupRoute {
    LookupRoute::EmployeeUsers
}

/// Window preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_window_width() -> f32 {
    760.0
}

fn default_window_height() -> f32 {
    820.0
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    ///
    /// Falls back to the executable's directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        match ProjectDirs::from("", "", "employee-roster") {
            Some(dirs) => dirs.config_dir().join("config.toml"),
            None => std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("config.toml"),
        }
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;

        let roster = &self.roster;
        if roster.page_size_options.is_empty() {
            return Err(ConfigError::Validation(
                "Page size options cannot be empty".to_string(),
            ));
        }
        if roster.page_size_options.contains(&0) {
            return Err(ConfigError::Validation(
                "Page size options must be greater than 0".to_string(),
            ));
        }
        if !roster.page_size_options.contains(&roster.page_size) {
            return Err(ConfigError::Validation(format!(
                "Page size {} is not one of the page size options",
                roster.page_size
            )));
        }
        if roster.debounce_ms < 50 {
            return Err(ConfigError::Validation("Debounce must be at least 50 ms".to_string()));
        }
        if roster.debounce_ms > 5000 {
            return Err(ConfigError::Validation("Debounce cannot exceed 5000 ms".to_string()));
        }
        if self.ui.window_width <= 0.0 || self.ui.window_height <= 0.0 {
            return Err(ConfigError::Validation("Window size must be positive".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ApiConfig {
    /// Validate the backend connection settings on their own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RosterConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            debounce_ms: default_debounce_ms(),
            query_lookup: default_query_lookup(),
            search_lookup: default_search_lookup(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}
