//! Configuration service implementation.
//!
//! Loads the root configuration from the configuration file
//! (`<config dir>/intake/config.toml`) and caches it. The dual-authority
//! capability flag lives here; reading it costs nothing beyond an atomic
//! load once the [`AuthorityFlag`] handle is built.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use intake_core::authority::{Authority, AuthorityFlag};
use intake_core::error::Result;

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

/// Root configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootConfig {
    /// Base URL of the agent-session endpoints.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Whether the external server-authoritative cache owns session state.
    #[serde(default)]
    pub server_authoritative: bool,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            server_authoritative: false,
        }
    }
}

impl RootConfig {
    pub fn authority(&self) -> Authority {
        if self.server_authoritative {
            Authority::Server
        } else {
            Authority::Local
        }
    }

    /// Builds the runtime handle components branch on.
    pub fn authority_flag(&self) -> AuthorityFlag {
        AuthorityFlag::new(self.authority())
    }
}

/// Configuration service that loads and caches the root configuration.
///
/// The configuration is loaded lazily on first access to avoid blocking
/// during initialization. A missing file yields the defaults.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
    path: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Creates a service reading from an explicit path. Used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path,
        }
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("intake")
            .join("config.toml")
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> RootConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!("failed to load config from {:?}: {}", self.path, e);
            RootConfig::default()
        });

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            return Ok(RootConfig::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&raw)?)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
