//! Configuration service implementation.
//!
//! Loads [`PagewaveConfig`] from `~/.config/pagewave/config.toml` (or an
//! explicit path), applies environment overrides and validates the result.

use crate::paths::PagewavePaths;
use pagewave_core::config::PagewaveConfig;
use pagewave_core::{PagewaveError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_SERVICE_URL: &str = "PAGEWAVE_SERVICE_URL";
pub const ENV_INFERENCE_URL: &str = "PAGEWAVE_INFERENCE_URL";

/// Configuration service that loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<PagewaveConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    pub fn new() -> Result<Self> {
        let path = PagewavePaths::config_file().map_err(|e| PagewaveError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading it on first access.
    pub fn get_config(&self) -> Result<PagewaveConfig> {
        if let Ok(cached) = self.config.read()
            && let Some(config) = cached.as_ref()
        {
            return Ok(config.clone());
        }

        let mut config = load_from(&self.path)?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;

        if let Ok(mut cache) = self.config.write() {
            *cache = Some(config.clone());
        }
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.config.write() {
            *cache = None;
        }
    }
}

/// Reads a config file; a missing file yields the defaults.
pub fn load_from(path: &Path) -> Result<PagewaveConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(PagewaveConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: PagewaveConfig = toml::from_str(&content)?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Applies `PAGEWAVE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut PagewaveConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_SERVICE_URL).filter(|v| !v.trim().is_empty()) {
        config.service.base_url = url;
    }
    if let Some(url) = lookup(ENV_INFERENCE_URL).filter(|v| !v.trim().is_empty()) {
        config.gestures.inference_url = url;
    }
}
