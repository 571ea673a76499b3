//! bookcal configuration at ~/.config/bookcal/config.toml

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::date_range::ViewKind;
use crate::error::{CalendarError, CalendarResult};

static DEFAULT_BASE_URL: &str = "http://localhost/index.php";
static DEFAULT_APPOINTMENTS_PATH: &str = "backend/ajax_get_calendar_appointments";
static DEFAULT_UPDATE_PATH: &str = "backend/ajax_save_appointment";
static DEFAULT_DIRECTORY_PATH: &str = "~/.config/bookcal/directory.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_appointments_path() -> String {
    DEFAULT_APPOINTMENTS_PATH.to_string()
}

fn default_update_path() -> String {
    DEFAULT_UPDATE_PATH.to_string()
}

fn default_directory_path() -> PathBuf {
    PathBuf::from(DEFAULT_DIRECTORY_PATH)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookcalConfig {
    /// Root of the booking backend, e.g. https://example.com/index.php
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_appointments_path")]
    pub appointments_path: String,

    #[serde(default = "default_update_path")]
    pub update_path: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// JSON file with the provider and service lists.
    #[serde(default = "default_directory_path")]
    pub directory_path: PathBuf,

    #[serde(default)]
    pub default_view: ViewKind,
}

impl Default for BookcalConfig {
    fn default() -> Self {
        BookcalConfig {
            base_url: default_base_url(),
            appointments_path: default_appointments_path(),
            update_path: default_update_path(),
            request_timeout_secs: default_timeout_secs(),
            directory_path: default_directory_path(),
            default_view: ViewKind::default(),
        }
    }
}

impl BookcalConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("bookcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template on first run.
    /// `BOOKCAL_*` environment variables override file values.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BOOKCAL"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Directory file path with `~` expanded.
    pub fn directory_file(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.directory_path.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# bookcal configuration

# Booking backend root:
# base_url = \"{}\"

# Endpoints, relative to base_url:
# appointments_path = \"{}\"
# update_path = \"{}\"

# Seconds before a backend request is abandoned:
# request_timeout_secs = {}

# Provider and service lists (JSON):
# directory_path = \"{}\"

# Calendar layout: day, week or month
# default_view = \"week\"
",
            DEFAULT_BASE_URL,
            DEFAULT_APPOINTMENTS_PATH,
            DEFAULT_UPDATE_PATH,
            DEFAULT_TIMEOUT_SECS,
            DEFAULT_DIRECTORY_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}
