// src/core/config.rs

//! Engine settings, read from `config.json` in the platform config directory.

use crate::core::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-query timeout and overall lifetime cap for DNS lookups.
    pub dns_timeout_secs: u64,
    /// Per-request timeout for directory probes.
    pub http_timeout_secs: u64,
    /// Connect/read timeout for each WHOIS server contacted.
    pub whois_timeout_secs: u64,
    /// Probes in flight at once inside one enumerator run.
    pub concurrency: usize,
    pub subdomain_wordlist: Option<PathBuf>,
    pub directory_wordlist: Option<PathBuf>,
    /// Entries kept in the rolling scan history.
    pub history_capacity: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dns_timeout_secs: 2,
            http_timeout_secs: 5,
            whois_timeout_secs: 10,
            concurrency: 16,
            subdomain_wordlist: None,
            directory_wordlist: None,
            history_capacity: 100,
            user_agent: format!("ReconWatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config file if present; any problem falls back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                info!(path = %path.display(), "Configuration loaded.");
                config
            }
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults.");
                Self::default()
            }
        }
    }

    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "reconwatch", env!("CARGO_PKG_NAME"))
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("dns_timeout_secs", self.dns_timeout_secs == 0),
            ("http_timeout_secs", self.http_timeout_secs == 0),
            ("whois_timeout_secs", self.whois_timeout_secs == 0),
            ("concurrency", self.concurrency == 0),
            ("history_capacity", self.history_capacity == 0),
        ];
        if let Some((field, _)) = checks.iter().find(|(_, bad)| *bad) {
            return Err(Error::ConfigInvalid {
                field: field.to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn whois_timeout(&self) -> Duration {
        Duration::from_secs(self.whois_timeout_secs)
    }
}
