//! Client configuration: where the remote store lives and how to log.
//!
//! Values come from an optional YAML file named by `EXPENSE_TRACKER_CONFIG`,
//! then `EXPENSE_TRACKER_API_URL` overrides the base URL.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "EXPENSE_TRACKER_CONFIG";
pub const BASE_URL_ENV: &str = "EXPENSE_TRACKER_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the remote store, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Per-request timeout; no timeout when absent
    pub request_timeout_secs: Option<u64>,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Invalid client configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`ClientConfig::load`])
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// File named by `EXPENSE_TRACKER_CONFIG` (or defaults), then env overrides
    pub fn load() -> Result<Self> {
        let config = match Self::source() {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Config file path from `EXPENSE_TRACKER_CONFIG`, if set
    pub fn source() -> Option<String> {
        std::env::var(CONFIG_PATH_ENV).ok()
    }
}
