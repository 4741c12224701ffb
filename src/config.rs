//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional config file,
//! then `TANKWATCH_*` environment variables. Nested keys use a double
//! underscore, e.g. `TANKWATCH_THRESHOLDS__TDS_MAX=450`.
//!
//! ```toml
//! refresh_ms = 250
//! log_file = "/var/log/tankwatch.log"
//!
//! [thresholds]
//! tds_max = 500.0
//! temp_min = 15.0
//! temp_max = 30.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::Thresholds;

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "TANKWATCH";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Safety thresholds used for classification.
    pub thresholds: Thresholds,
    /// UI tick and file poll interval in milliseconds.
    pub refresh_ms: u64,
    /// Where logs go; the terminal belongs to the UI.
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            refresh_ms: 250,
            log_file: PathBuf::from("tankwatch.log"),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder.add_source(env).build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(1))
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
