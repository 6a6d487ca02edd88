//! Application configuration management.
//!
//! Configuration is stored at `<config dir>/alumnae/config.json`. Remote
//! settings may also come from the environment (`ALUMNAE_API_URL`,
//! `ALUMNAE_API_KEY`), which take precedence over the file. The API key is
//! never written back to disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application name used for config/data directory paths
const APP_NAME: &str = "alumnae";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Bucket holding archive photos.
pub const DEFAULT_PHOTO_BUCKET: &str = "alumnae-photos";

/// Yearly membership dues in won.
pub const DEFAULT_ANNUAL_DUES: u64 = 50_000;

pub const ENV_API_URL: &str = "ALUMNAE_API_URL";
pub const ENV_API_KEY: &str = "ALUMNAE_API_KEY";
pub const ENV_BACKEND: &str = "ALUMNAE_BACKEND";

/// Where the roster lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub api_url: Option<String>,
    #[serde(skip)]
    pub api_key: Option<String>,
    pub photo_bucket: String,
    /// Members generated on a first local run with no saved roster.
    pub seed_size: usize,
    /// Dues per member per year, used for the admin dues summary.
    pub annual_dues: u64,
    /// Overrides the platform data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            api_url: None,
            api_key: None,
            photo_bucket: DEFAULT_PHOTO_BUCKET.to_string(),
            seed_size: 0,
            annual_dues: DEFAULT_ANNUAL_DUES,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults when absent) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        debug!(backend = ?config.backend, "Loaded config");
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup. Blank values are ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(key) = var(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        match var(ENV_BACKEND).as_deref() {
            Some("local") => self.backend = Backend::Local,
            Some("remote") => self.backend = Backend::Remote,
            _ => {}
        }
    }

    pub fn has_remote(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for local snapshots and log files.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}
