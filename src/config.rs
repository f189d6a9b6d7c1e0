// Configuration for the dataset fetcher.
// Loaded from a JSON file; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::{DEFAULT_CACHE_FILE, config_path};
use crate::error::{Result, WrangleError};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://python.zgulde.net";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheme and host of the API; endpoint paths are appended to it.
    pub base_url: String,
    /// Where the joined dataset is cached.
    pub cache_path: PathBuf,
    /// Upper bound on pages followed per endpoint. None follows the chain
    /// until the server stops it.
    pub max_pages: Option<u32>,
    /// Also write each endpoint's table next to the cache file.
    pub keep_intermediate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            max_pages: None,
            keep_intermediate: false,
        }
    }
}

impl Config {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the platform config file if there is one, else use defaults.
    pub fn load_or_default() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Use a different cache file.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(WrangleError::Config("base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WrangleError::Config(format!(
                "base_url must start with http:// or https://, got {url}"
            )));
        }
        if self.cache_path.as_os_str().is_empty() {
            return Err(WrangleError::Config("cache_path is empty".to_string()));
        }
        if self.max_pages == Some(0) {
            return Err(WrangleError::Config("max_pages must be at least 1".to_string()));
        }
        Ok(())
    }
}
