//! Configuration types.
//!
//! Configuration lives in `config.toml` under the platform config directory
//! (`~/.config/probe/config.toml` on Linux). Every field has a default, so a
//! missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable that overrides `endpoint.base_url`.
pub const ENDPOINT_ENV: &str = "PROBE_ENDPOINT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Search service settings
    pub endpoint: EndpointConfig,

    /// Typeahead behaviour
    pub typeahead: TypeaheadConfig,

    /// Where resolved paths are opened
    pub console: ConsoleConfig,
}

/// Search service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL; `/search` is appended.
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_ms: 5_000,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Typeahead configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadConfig {
    /// Quiet period after a keystroke before the search is sent.
    pub debounce_ms: u64,

    /// Report `All` instead of the classified intent when results span
    /// more than one type.
    pub widen_mixed_intent: bool,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            widen_mixed_intent: false,
        }
    }
}

impl TypeaheadConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL resolved paths are joined onto.
    pub base_url: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl ProbeConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the endpoint base URL when an override is present.
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = endpoint.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Endpoint overridden to {}", url);
            self.endpoint.base_url = url;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.endpoint.base_url;
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidEndpoint(url.clone()))
        }
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("probe"))
}

/// Get the path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration.
///
/// With an explicit path the file must exist. Without one, the default
/// location is used and a missing file yields defaults. `PROBE_ENDPOINT`
/// is applied last.
pub fn load_config(explicit: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = config_path().ok_or(ConfigError::NoConfigDir)?;
            if path.exists() {
                read_config(&path)?
            } else {
                tracing::info!("No config at {:?}, using defaults", path);
                ProbeConfig::default()
            }
        }
    };

    config.with_endpoint_override(std::env::var(ENDPOINT_ENV).ok())
}

fn read_config(path: &Path) -> Result<ProbeConfig, ConfigError> {
    tracing::info!("Loading config from {:?}", path);
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ProbeConfig::from_toml_str(&text, path)
}
