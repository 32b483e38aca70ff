//! Configuration for shelf-core
//!
//! Lookup policy, provider priority, timeouts and per-provider endpoints.
//! Every field has a default so partial TOML files are accepted.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::ProviderId;
use crate::http::DEFAULT_USER_AGENT;
use crate::resolution::MergePolicy;

/// Bounds for the per-provider timeout in seconds
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Resolution engine settings
    pub lookup: LookupConfig,
    /// Provider endpoints and credentials
    pub sources: SourcesConfig,
}

/// Resolution engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// How provider results are reconciled
    pub policy: MergePolicy,
    /// Providers from most to least trusted
    pub priority: Vec<ProviderId>,
    /// Per-provider call timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent to every provider
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            policy: MergePolicy::PriorityFallback,
            priority: ProviderId::all().to_vec(),
            timeout_secs: 8,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub google_books: GoogleBooksConfig,
    pub open_library: OpenLibraryConfig,
    pub isbndb: IsbndbConfig,
}

impl SourcesConfig {
    pub fn is_enabled(&self, id: ProviderId) -> bool {
        match id {
            ProviderId::GoogleBooks => self.google_books.enabled,
            ProviderId::OpenLibrary => self.open_library.enabled,
            ProviderId::Isbndb => self.isbndb.enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleBooksConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.googleapis.com/books/v1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenLibraryConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Host serving cover images by id
    pub covers_url: String,
    /// Fetch author records when the edition only references them
    pub resolve_authors: bool,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://openlibrary.org".to_string(),
            covers_url: "https://covers.openlibrary.org".to_string(),
            resolve_authors: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsbndbConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Sent as the `Authorization` header
    pub api_key: Option<String>,
}

impl Default for IsbndbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api2.isbndb.com".to_string(),
            api_key: None,
        }
    }
}

impl ShelfConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file at [`default_config_path`], or defaults when it does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Enabled providers in priority order
    pub fn enabled_providers(&self) -> Vec<ProviderId> {
        self.lookup
            .priority
            .iter()
            .copied()
            .filter(|id| self.sources.is_enabled(*id))
            .collect()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, id) in self.lookup.priority.iter().enumerate() {
            if self.lookup.priority[..i].contains(id) {
                return Err(ConfigError::DuplicateProvider(*id));
            }
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.lookup.timeout_secs) {
            return Err(ConfigError::OutOfRange(format!(
                "timeout_secs must be between {} and {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
            )));
        }

        if self.enabled_providers().is_empty() {
            return Err(ConfigError::NoProviders);
        }

        Ok(())
    }
}

/// `<config dir>/shelf/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shelf").join("config.toml"))
}

/// Configuration loading or validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Could not parse configuration: {0}")]
    Parse(String),
    #[error("Could not read {path:?}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("Provider {0} listed more than once in priority")]
    DuplicateProvider(ProviderId),
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("No enabled provider in priority list")]
    NoProviders,
}
