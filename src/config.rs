use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Environment variable prefix, e.g. `SAHITYOTSAV_API__BASE_URL`.
pub const ENV_PREFIX: &str = "SAHITYOTSAV_";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub api: ApiConfig,
    pub scoreboard: ScoreboardConfig,
    pub downloads: DownloadsConfig,
    pub data: DataConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Festival backend connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the REST API. A trailing slash is added if missing.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    /// Seconds between points refreshes.
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadsConfig {
    /// Where posters are saved. Defaults to the user's download folder.
    pub dir: Option<PathBuf>,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self { refresh_secs: 10 }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/sahityotsav/config.toml` and the
    /// environment. Returns `Default` if either source is unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Same as [`AppConfig::load`] with an explicit config file.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            log::info!("Loading config from {}", path.display());
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        match Self::figment(path).extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Layered sources: defaults, then the TOML file, then `SAHITYOTSAV_*`.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("sahityotsav"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    /// Directory posters are written to.
    pub fn downloads_dir(&self) -> PathBuf {
        self.downloads.dir.clone().unwrap_or_else(|| {
            dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sahityotsav").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
