use std::path::{Path, PathBuf};
use std::time::Duration;

use kakebo_core::period::PeriodKind;
use kakebo_core::storage::{ScanPolicy, StoreOptions, DEFAULT_LOCK_TIMEOUT};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STORE_FILE;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KakeboConfig {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    /// Store file; the XDG data directory is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    #[serde(default)]
    pub period: PeriodKind,
    #[serde(default)]
    pub scan_policy: ScanPolicy,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: None,
            lock_timeout_ms: default_lock_timeout_ms(),
            period: PeriodKind::default(),
            scan_policy: ScanPolicy::default(),
        }
    }
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT.as_millis() as u64
}

impl KakeboConfig {
    pub fn new(store_path: PathBuf, period: PeriodKind) -> Self {
        Self {
            store: StoreSection {
                path: Some(store_path.to_string_lossy().to_string()),
                period,
                ..StoreSection::default()
            },
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::new()
            .lock_timeout(Duration::from_millis(self.store.lock_timeout_ms))
            .period_kind(self.store.period)
            .scan_policy(self.store.scan_policy)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(DEFAULT_STORE_FILE))
}

pub fn read_config(path: &Path) -> anyhow::Result<KakeboConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &KakeboConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("kakebo"));
        }
    }
    Ok(home_dir()?.join(".config").join("kakebo"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("kakebo"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("kakebo"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: KakeboConfig = toml::from_str("").unwrap();
        assert!(config.store.path.is_none());
        assert_eq!(config.store.lock_timeout_ms, 1000);
        assert_eq!(config.store.period, PeriodKind::Month);
        assert_eq!(config.store.scan_policy, ScanPolicy::Skip);
    }

    #[test]
    fn test_parse_full_config() {
        let config: KakeboConfig = toml::from_str(
            "[store]\npath = \"/tmp/k.db\"\nlock_timeout_ms = 250\nperiod = \"week\"\nscan_policy = \"abort\"\n",
        )
        .unwrap();
        assert_eq!(config.store.path.as_deref(), Some("/tmp/k.db"));

        let options = config.store_options();
        assert_eq!(options.lock_timeout, Duration::from_millis(250));
        assert_eq!(options.period_kind, PeriodKind::Week);
        assert_eq!(options.scan_policy, ScanPolicy::Abort);
    }

    #[test]
    fn test_unknown_period_rejected() {
        let result: Result<KakeboConfig, _> = toml::from_str("[store]\nperiod = \"fortnight\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = KakeboConfig::new(dir.path().join("k.db"), PeriodKind::Week);

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.store.path, config.store.path);
        assert_eq!(loaded.store.period, PeriodKind::Week);
    }
}
