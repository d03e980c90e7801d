//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, read_config, KakeboConfig};
use crate::constants::CONFIG_ENV;

/// Resolve the config file path: `--config`, then `KAKEBO_CONFIG`, then XDG.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(config_path: &Path) -> anyhow::Result<KakeboConfig> {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(KakeboConfig::default());
    }
    read_config(config_path)
}

/// Resolve the store path: `--db`/`KAKEBO_DB`, then the config, then XDG.
pub fn resolve_store_path(cli: &Cli, config: &KakeboConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.db {
        return Ok(path.clone());
    }
    if let Some(path) = &config.store.path {
        return Ok(PathBuf::from(path));
    }
    default_store_path()
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!("No store found at {}", path.display())
}
