//! # Register Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_DATA_DIR=/var/lib/till                                        │
//! │     TILL_TIMEZONE=Europe/Madrid                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/till-register/register.toml (Linux)                      │
//! │     ~/Library/Application Support/com.till.register/register.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! data_dir = "/var/lib/till"
//! export_dir = "/srv/share/sales"
//! timezone = "Europe/Madrid"
//! currency_symbol = "€"
//! catalog_path = "/etc/till/catalog.json"
//! ```

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use till_core::export::DEFAULT_CURRENCY_SYMBOL;

use crate::error::{RegisterError, RegisterResult};

pub const CONFIG_FILE_NAME: &str = "register.toml";

pub const ENV_DATA_DIR: &str = "TILL_DATA_DIR";
pub const ENV_EXPORT_DIR: &str = "TILL_EXPORT_DIR";
pub const ENV_TIMEZONE: &str = "TILL_TIMEZONE";
pub const ENV_CURRENCY_SYMBOL: &str = "TILL_CURRENCY_SYMBOL";
pub const ENV_CATALOG_PATH: &str = "TILL_CATALOG_PATH";

const DEFAULT_TIMEZONE_NAME: &str = "Europe/Madrid";
const FALLBACK_DATA_DIR: &str = "till-data";
const EXPORT_SUBDIR: &str = "exports";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "till", "register")
}

fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

fn default_export_dir() -> PathBuf {
    default_data_dir().join(EXPORT_SUBDIR)
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE_NAME.to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

/// Register settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Where the cart and ledger snapshots live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where CSV exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// IANA zone used for sale timestamps and export filenames.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Appended to every monetary CSV cell.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Optional product catalog (JSON array).
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        RegisterConfig {
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            timezone: default_timezone(),
            currency_symbol: default_currency_symbol(),
            catalog_path: None,
        }
    }
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`register.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RegisterResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading register config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load register config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> RegisterResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RegisterError::io(path, e))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> RegisterResult<()> {
        self.tz()?;

        if self.currency_symbol.trim().is_empty() {
            return Err(RegisterError::Config(
                "currency_symbol must not be empty".into(),
            ));
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(RegisterError::Config("data_dir must not be empty".into()));
        }

        if self.export_dir.as_os_str().is_empty() {
            return Err(RegisterError::Config("export_dir must not be empty".into()));
        }

        Ok(())
    }

    /// The configured timezone.
    pub fn tz(&self) -> RegisterResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            RegisterError::Config(format!("Unknown timezone: '{}'", self.timezone))
        })
    }

    /// Applies overrides from `lookup`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup(ENV_EXPORT_DIR) {
            debug!(export_dir = %dir, "Overriding export dir from environment");
            self.export_dir = PathBuf::from(dir);
        }

        if let Some(tz) = lookup(ENV_TIMEZONE) {
            debug!(timezone = %tz, "Overriding timezone from environment");
            self.timezone = tz;
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            self.currency_symbol = symbol;
        }

        if let Some(path) = lookup(ENV_CATALOG_PATH) {
            self.catalog_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
    }

    /// `register.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
