//! Configuration management for Slidegen CLI
//!
//! Stores the backend URL and download directory in ~/.config/slidegen/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use slidegen::{EndpointConfig, DEFAULT_BASE_URL};

const CONFIG_DIR: &str = "slidegen";
const CONFIG_FILE: &str = "config.toml";

/// Overrides `base_url` from the environment (or `.env`)
pub const BASE_URL_ENV: &str = "SLIDEGEN_BASE_URL";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: None,
        }
    }
}

impl Config {
    /// `<platform config dir>/slidegen/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR)
            .join(CONFIG_FILE))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .with_context(|| format!("Invalid config at {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read config from {}", path.display()))
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Apply environment and command-line overrides, in that order
    pub fn with_overrides(mut self, env_url: Option<String>, cli_url: Option<String>) -> Self {
        if let Some(url) = cli_url.or(env_url).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url.trim_end_matches('/').to_string();
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) {
        self.output_dir = Some(dir);
    }

    pub fn endpoint(&self) -> EndpointConfig {
        EndpointConfig::new(&self.base_url)
    }

    /// Configured directory, else the platform download directory, else cwd
    pub fn resolve_output_dir(&self, cli_dir: Option<PathBuf>) -> PathBuf {
        cli_dir
            .or_else(|| self.output_dir.clone())
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
