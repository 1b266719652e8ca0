//! TOML configuration and data directory resolution.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.toml";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TASKLIST_DATA_DIR";

/// Top-level configuration loaded from `<config dir>/tasklist/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Where tasks are stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Terminal UI behavior.
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or from the platform default location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        Self::from_path(&config_path)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.ui.validate()
    }

    /// Resolve the data directory: CLI flag, then `TASKLIST_DATA_DIR`, then
    /// the config file, then the platform data directory.
    pub fn resolve_data_dir(&self, cli: Option<PathBuf>) -> Option<PathBuf> {
        let from_env = env::var_os(DATA_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        self.resolve_data_dir_with(cli, from_env, default_data_dir())
    }

    fn resolve_data_dir_with(
        &self,
        cli: Option<PathBuf>,
        from_env: Option<PathBuf>,
        platform: Option<PathBuf>,
    ) -> Option<PathBuf> {
        cli.or(from_env)
            .or_else(|| self.storage.data_dir.clone())
            .or(platform)
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding `tasks.json`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Optional cap on the size of the stored collection, in bytes.
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.quota_bytes == Some(0) {
            bail!("storage.quota_bytes must be greater than zero");
        }
        if self
            .data_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            bail!("storage.data_dir must not be empty");
        }
        Ok(())
    }
}

/// `[ui]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Ask before clearing completed tasks.
    #[serde(default = "default_confirm_clear")]
    pub confirm_clear_completed: bool,
    /// Seconds a status message stays visible.
    #[serde(default = "default_message_ttl")]
    pub message_ttl_secs: u64,
    /// Milliseconds between UI ticks.
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_clear_completed: default_confirm_clear(),
            message_ttl_secs: default_message_ttl(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl UiConfig {
    fn validate(&self) -> Result<()> {
        if self.message_ttl_secs == 0 {
            bail!("ui.message_ttl_secs must be greater than zero");
        }
        if self.tick_rate_ms == 0 {
            bail!("ui.tick_rate_ms must be greater than zero");
        }
        Ok(())
    }
}

const fn default_confirm_clear() -> bool {
    true
}

const fn default_message_ttl() -> u64 {
    5
}

const fn default_tick_rate() -> u64 {
    200
}

/// Default location of the configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Default data directory.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE);
        let mut file = fs::File::create(&path)?;
        writeln!(file, "{contents}")?;
        Ok(path)
    }

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::from_path(&dir.path().join(CONFIG_FILE))?;
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.ui.confirm_clear_completed);
        assert_eq!(cfg.ui.message_ttl_secs, 5);
        assert_eq!(cfg.ui.tick_rate_ms, 200);
        assert!(cfg.storage.data_dir.is_none());
        Ok(())
    }

    #[test]
    fn load_config_with_all_keys() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(
            dir.path(),
            "[storage]\ndata_dir = \"/tmp/tasks\"\nquota_bytes = 5242880\n\n[ui]\nconfirm_clear_completed = false\nmessage_ttl_secs = 3\ntick_rate_ms = 100",
        )?;

        let cfg = AppConfig::load(Some(&path))?;
        assert_eq!(cfg.storage.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert_eq!(cfg.storage.quota_bytes, Some(5_242_880));
        assert!(!cfg.ui.confirm_clear_completed);
        assert_eq!(cfg.ui.message_ttl_secs, 3);
        assert_eq!(cfg.ui.tick_rate_ms, 100);
        Ok(())
    }

    #[test]
    fn partial_ui_block_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(dir.path(), "[ui]\nconfirm_clear_completed = false")?;
        let cfg = AppConfig::from_path(&path)?;
        assert!(!cfg.ui.confirm_clear_completed);
        assert_eq!(cfg.ui.message_ttl_secs, 5);
        Ok(())
    }

    #[test]
    fn zero_values_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(dir.path(), "[ui]\nmessage_ttl_secs = 0")?;
        let Err(err) = AppConfig::from_path(&path) else {
            panic!("zero ttl should error");
        };
        assert!(format!("{err:#}").contains("ui.message_ttl_secs must be greater than zero"));

        let path = write_config(dir.path(), "[storage]\nquota_bytes = 0")?;
        let Err(err) = AppConfig::from_path(&path) else {
            panic!("zero quota should error");
        };
        assert!(format!("{err:#}").contains("storage.quota_bytes"));
        Ok(())
    }

    #[test]
    fn malformed_toml_reports_path() -> Result<()> {
        let dir = tempdir()?;
        let path = write_config(dir.path(), "[ui\nbroken")?;
        let Err(err) = AppConfig::from_path(&path) else {
            panic!("malformed config should error");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn data_dir_resolution_order() {
        let cfg = AppConfig {
            storage: StorageConfig {
                data_dir: Some("/from/config".into()),
                quota_bytes: None,
            },
            ..AppConfig::default()
        };
        let platform = Some(PathBuf::from("/platform"));

        let resolved = cfg.resolve_data_dir_with(
            Some("/from/cli".into()),
            Some("/from/env".into()),
            platform.clone(),
        );
        assert_eq!(resolved, Some(PathBuf::from("/from/cli")));

        let resolved = cfg.resolve_data_dir_with(None, Some("/from/env".into()), platform.clone());
        assert_eq!(resolved, Some(PathBuf::from("/from/env")));

        let resolved = cfg.resolve_data_dir_with(None, None, platform.clone());
        assert_eq!(resolved, Some(PathBuf::from("/from/config")));

        let resolved = AppConfig::default().resolve_data_dir_with(None, None, platform);
        assert_eq!(resolved, Some(PathBuf::from("/platform")));

        assert!(AppConfig::default().resolve_data_dir_with(None, None, None).is_none());
    }
}
