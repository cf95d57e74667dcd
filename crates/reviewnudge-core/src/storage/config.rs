//! TOML-based nudge configuration.
//!
//! Stores user preferences including:
//! - Reminder interval and snooze duration
//! - Quiet hours (may wrap past midnight)
//! - Master enable switch
//! - Deck to open when the user accepts a nudge
//!
//! Configuration is stored at `~/.config/reviewnudge/config.toml`.
//!
//! Loading is lenient: every missing or invalid field falls back to its
//! default independently, and a file that is not valid TOML yields the full
//! default configuration. Explicit edits through [`Config::set`] are strict.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::nudge::QuietHours;

pub const DEFAULT_INTERVAL_MINUTES: f64 = 30.0;
pub const DEFAULT_SNOOZE_MINUTES: f64 = 5.0;
pub const MAX_INTERVAL_MINUTES: f64 = 24.0 * 60.0;
pub const MAX_SNOOZE_MINUTES: f64 = 240.0;

/// Effective durations are never shorter than this.
const MIN_DURATION_SECS: i64 = 60;

/// Nudge configuration.
///
/// Serialized to/from TOML at `~/.config/reviewnudge/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: f64,
    #[serde(default = "default_snooze_minutes")]
    pub snooze_minutes: f64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Deck the host should open when the user starts a review.
    /// `None` keeps whatever deck is current.
    #[serde(default)]
    pub target_deck_id: Option<i64>,
    #[serde(default)]
    pub quiet_hours: QuietHours,
}

// Default functions
fn default_interval_minutes() -> f64 {
    DEFAULT_INTERVAL_MINUTES
}
fn default_snooze_minutes() -> f64 {
    DEFAULT_SNOOZE_MINUTES
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            enabled: true,
            target_deck_id: None,
            quiet_hours: QuietHours::default(),
        }
    }
}

impl Config {
    /// Time between nudges while the user is not reviewing.
    pub fn interval(&self) -> Duration {
        minutes_to_duration(self.interval_minutes)
    }

    /// Deferral applied by the snooze action.
    pub fn snooze_duration(&self) -> Duration {
        minutes_to_duration(self.snooze_minutes)
    }

    /// Snooze minutes as shown on buttons and menu labels.
    pub fn snooze_label_minutes(&self) -> i64 {
        self.snooze_duration().num_minutes()
    }

    // ── Lenient loading ──────────────────────────────────────────────

    /// Parse TOML text, substituting defaults for anything missing or invalid.
    pub fn from_toml_lenient(content: &str) -> Self {
        match content.parse::<toml::Table>() {
            Ok(table) => Self::from_table(&table),
            Err(e) => {
                warn!(error = %e, "config is not valid TOML, using defaults");
                Self::default()
            }
        }
    }

    /// Build a config from a parsed TOML table, field by field.
    pub fn from_table(table: &toml::Table) -> Self {
        let defaults = Self::default();
        Self {
            interval_minutes: read_minutes(
                table,
                "interval_minutes",
                MAX_INTERVAL_MINUTES,
                defaults.interval_minutes,
            ),
            snooze_minutes: read_minutes(
                table,
                "snooze_minutes",
                MAX_SNOOZE_MINUTES,
                defaults.snooze_minutes,
            ),
            enabled: read_bool(table, "enabled", "enabled", defaults.enabled),
            target_deck_id: read_deck_id(table),
            quiet_hours: read_quiet_hours(table),
        }
    }

    /// Strict check used for explicit edits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !valid_minutes(self.interval_minutes, MAX_INTERVAL_MINUTES) {
            return Err(invalid(
                "interval_minutes",
                format!("must be greater than 0 and at most {MAX_INTERVAL_MINUTES}"),
            ));
        }
        if !valid_minutes(self.snooze_minutes, MAX_SNOOZE_MINUTES) {
            return Err(invalid(
                "snooze_minutes",
                format!("must be greater than 0 and at most {MAX_SNOOZE_MINUTES}"),
            ));
        }
        if self.quiet_hours.start > 23 {
            return Err(invalid("quiet_hours.start", "must be an hour between 0 and 23"));
        }
        if self.quiet_hours.end > 23 {
            return Err(invalid("quiet_hours.end", "must be an hour between 0 and 23"));
        }
        if matches!(self.target_deck_id, Some(id) if id <= 0) {
            return Err(invalid("target_deck_id", "must be a positive deck id"));
        }
        Ok(())
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Default config file location.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults when the file does not exist.
    ///
    /// An unreadable or malformed file never fails the load; defaults are
    /// substituted instead.
    ///
    /// # Errors
    ///
    /// Returns an error only if the missing file cannot be created.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded config");
                Ok(Self::from_toml_lenient(&content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SaveFailed`] if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    // ── Dot-path access ──────────────────────────────────────────────

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The change is validated but not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is out of range. `self` is left untouched on
    /// error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = parse_like(existing, value).ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("cannot parse '{value}'"),
            })?;
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }
}

/// Parse `value` into the JSON type of `existing`.
fn parse_like(existing: &serde_json::Value, value: &str) -> Option<serde_json::Value> {
    use serde_json::Value;

    let parse_number = |value: &str| -> Option<Value> {
        if let Ok(n) = value.parse::<i64>() {
            Some(Value::Number(n.into()))
        } else {
            value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
        }
    };

    // Clears optional fields; non-optional ones reject null on deserialize.
    if matches!(value, "none" | "null") {
        return Some(Value::Null);
    }

    match existing {
        Value::Bool(_) => value.parse::<bool>().ok().map(Value::Bool),
        Value::Number(_) => parse_number(value),
        Value::Null => match value {
            "" => Some(Value::Null),
            other => parse_number(other),
        },
        Value::Object(_) | Value::Array(_) => serde_json::from_str(value).ok(),
        Value::String(_) => Some(Value::String(value.into())),
    }
}

fn minutes_to_duration(minutes: f64) -> Duration {
    let secs = (minutes * 60.0).round() as i64;
    Duration::seconds(secs.max(MIN_DURATION_SECS))
}

fn valid_minutes(minutes: f64, max: f64) -> bool {
    minutes.is_finite() && minutes > 0.0 && minutes <= max
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(n) => Some(*n as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn read_minutes(table: &toml::Table, key: &str, max: f64, default: f64) -> f64 {
    let Some(value) = table.get(key) else {
        return default;
    };
    match as_number(value) {
        Some(minutes) if valid_minutes(minutes, max) => minutes,
        _ => {
            warn!(key, value = %value, default, "invalid config value, using default");
            default
        }
    }
}

fn read_bool(table: &toml::Table, key: &str, path: &str, default: bool) -> bool {
    match table.get(key) {
        None => default,
        Some(toml::Value::Boolean(b)) => *b,
        Some(other) => {
            warn!(key = path, value = %other, default, "invalid config value, using default");
            default
        }
    }
}

fn read_hour(table: &toml::Table, key: &str, path: &str, default: u8) -> u8 {
    match table.get(key) {
        None => default,
        Some(toml::Value::Integer(h)) if (0..=23).contains(h) => *h as u8,
        Some(other) => {
            warn!(key = path, value = %other, default, "invalid quiet hour, using default");
            default
        }
    }
}

fn read_quiet_hours(table: &toml::Table) -> QuietHours {
    let defaults = QuietHours::default();
    let Some(value) = table.get("quiet_hours") else {
        return defaults;
    };
    let Some(quiet) = value.as_table() else {
        warn!(value = %value, "quiet_hours is not a table, using default");
        return defaults;
    };
    QuietHours {
        enabled: read_bool(quiet, "enabled", "quiet_hours.enabled", defaults.enabled),
        start: read_hour(quiet, "start", "quiet_hours.start", defaults.start),
        end: read_hour(quiet, "end", "quiet_hours.end", defaults.end),
    }
}

fn read_deck_id(table: &toml::Table) -> Option<i64> {
    match table.get("target_deck_id")? {
        toml::Value::Integer(id) if *id > 0 => Some(*id),
        other => {
            warn!(value = %other, "invalid target_deck_id, using current deck");
            None
        }
    }
}
