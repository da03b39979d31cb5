//! Configuration for alertr.
//!
//! Layered with figment: built-in defaults, then a TOML file (the platform
//! config path or an explicit one), then `ALERTR_` environment variables.
//! Nested keys use a double underscore, e.g.
//! `ALERTR_STORE__SENSOR_ALERT_LIFETIME_SECS=600`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use alertr_core::{DataStore, SystemOption};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,

    /// Server options seeded into the store at startup, keyed by type.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSettings {
    /// How long a sensor alert is kept before it may be pruned.
    #[serde(default = "default_sensor_alert_lifetime")]
    pub sensor_alert_lifetime_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            sensor_alert_lifetime_secs: default_sensor_alert_lifetime(),
        }
    }
}

fn default_sensor_alert_lifetime() -> u64 {
    3600
}

impl StoreSettings {
    pub fn sensor_alert_lifetime(&self) -> Duration {
        Duration::from_secs(self.sensor_alert_lifetime_secs)
    }

    /// Receive time before which sensor alerts have expired at `now`.
    ///
    /// Pass the result to `DataStore::delete_sensor_alerts_received_before`.
    pub fn sensor_alert_cutoff(&self, now: DateTime<Utc>) -> i64 {
        let lifetime = i64::try_from(self.sensor_alert_lifetime_secs).unwrap_or(i64::MAX);
        now.timestamp().saturating_sub(lifetime)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "alertr", "alertr").map_or_else(
        || PathBuf::from(".alertr").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from `path` (or the platform path) plus environment.
///
/// A missing file is not an error; defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("ALERTR_").split("__"))
        .extract()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.store.sensor_alert_lifetime_secs == 0 {
        return Err(ConfigError::Validation {
            field: "store.sensor_alert_lifetime_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }
    if let Some(empty) = config.options.keys().find(|key| key.trim().is_empty()) {
        return Err(ConfigError::Validation {
            field: "options".into(),
            reason: format!("option type may not be blank (got {empty:?})"),
        });
    }
    Ok(())
}

// ── Store seeding ───────────────────────────────────────────────────

/// Write every configured option into `store`. Returns how many were seeded.
pub fn seed_options(config: &Config, store: &DataStore) -> usize {
    for (option_type, value) in &config.options {
        store.update_option(SystemOption::new(option_type.as_str(), value.as_str()));
    }
    debug!(count = config.options.len(), "seeded options");
    config.options.len()
}
