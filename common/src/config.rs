use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const API_URL_ENV: &str = "SFF_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL as stored on disk; `None` means the mock backend
    pub api_base_url: Option<String>,
    /// Whether the mock sleeps like a real backend
    pub mock_latency: bool,
    pub timeout_seconds: u64,
    pub default_output_dir: Option<PathBuf>,
    /// `SFF_API_URL` at load time; never written back
    #[serde(skip)]
    api_url_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            mock_latency: true,
            timeout_seconds: 120,
            default_output_dir: None,
            api_url_override: None,
        }
    }
}

impl Config {
    /// Stored settings with the environment override applied
    pub fn load() -> Result<Self> {
        let config = Self::read_from(&Self::config_path()?)?;
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Missing file means defaults; anything else unreadable is an error
    pub fn read_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/saccani-form-filler/config.json"))
            .ok_or_else(|| Error::Config("home directory not found".into()))
    }

    /// Blank values are ignored
    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        self.api_url_override = url.filter(|url| !url.trim().is_empty());
        self
    }

    /// The override wins over the stored URL
    pub fn api_base_url(&self) -> Option<String> {
        self.api_url_override
            .clone()
            .or_else(|| self.api_base_url.clone())
    }

    /// Updates the stored URL and persists it
    pub fn set_api_url(&mut self, url: Option<String>) -> Result<()> {
        self.api_base_url = url;
        self.write_to(&Self::config_path()?)
    }
}
