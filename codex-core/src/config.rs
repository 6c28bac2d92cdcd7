//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! User-editable settings for Hex Codex, stored as TOML at the platform
//! config path resolved by [`directories`](https://docs.rs/directories).
//!
//! ## Features
//! - XDG-compliant config discovery and writing (Linux, macOS, Windows)
//! - Defaults written on first run so the file is discoverable
//! - Async load/save for smooth integration with Tokio
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save_to(&Config::config_path()?).await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::AppError;

use tokio::fs as TokioFs;

/// Published spreadsheet the codex reads by default.
pub const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRx56A4vCAtaQFiRV1sDnQ_YsjWiJJtVxe5GW0oU80X9pr1gwt-TaurLjoOxzMS_S0RWNulHz56jI_O/pub?gid=2010381338&single=true&output=csv";

/// Where the spell table comes from and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// `http(s)://` URL or a local path (optionally `file://`-prefixed)
    pub location: String,

    /// Whole-request timeout for remote sources
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_SOURCE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Display preferences for the card grid and notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    /// Number of card columns in the grid (clamped to 1..=4)
    pub card_columns: u16,

    /// How often the event loop ticks to expire notifications
    #[serde(with = "humantime_serde")]
    pub tick_rate: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            card_columns: 2,
            tick_rate: Duration::from_millis(250),
        }
    }
}

impl UiConfig {
    #[must_use]
    pub fn columns(&self) -> u16 {
        self.card_columns.clamp(1, 4)
    }
}

/// Logging preferences; `RUST_LOG` still wins when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,

    pub dir: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: PathBuf::from("logs"),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads config from the platform config dir, or writes and returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/HexCodex/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    /// Loads config from an explicit path, creating it with defaults if absent.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        let exists = TokioFs::try_exists(path)
            .await
            .map_err(|e| AppError::config_io(path, e))?;

        if exists {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|e| AppError::config_io(path, e))?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str)
            .await
            .map_err(|e| AppError::config_io(path, e))?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the config directory (without filename).
    pub fn config_dir() -> Result<PathBuf, AppError> {
        let proj_dirs = ProjectDirs::from("org", "hexcodex", "HexCodex")
            .ok_or(AppError::ConfigDirUnavailable)?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).await.unwrap();
        assert_eq!(reloaded, cfg);
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            "[source]\nlocation = \"spells.csv\"\ntimeout = \"5s\"\n",
        )
        .await
        .unwrap();

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg.source.location, "spells.csv");
        assert_eq!(cfg.source.timeout, Duration::from_secs(5));
        assert_eq!(cfg.ui, UiConfig::default());
        assert_eq!(cfg.log.level, "info");
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "source = [").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("Config parse error"));
    }

    #[tokio::test]
    async fn unwritable_location_reports_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        tokio::fs::write(&blocker, "").await.unwrap();
        let path = blocker.join("config.toml");

        let err = Config::load_from(&path).await.unwrap_err();
        match err {
            AppError::ConfigIo { path: reported, .. } => {
                assert!(reported.starts_with(&blocker));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn card_columns_are_clamped() {
        let ui = UiConfig {
            card_columns: 9,
            ..UiConfig::default()
        };
        assert_eq!(ui.columns(), 4);

        let ui = UiConfig {
            card_columns: 0,
            ..UiConfig::default()
        };
        assert_eq!(ui.columns(), 1);
    }
}
