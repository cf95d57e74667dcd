//! Named configurations that replace the whole config in one step.
//!
//! Meant for trying the nudger out: `fast` nudges every minute, `quiet` and
//! `disabled` check that nothing is shown.

use serde::{Deserialize, Serialize};

use super::config::Config;
use crate::error::ConfigError;
use crate::nudge::QuietHours;

/// Shortest interval and snooze a preset uses; matches the duration floor.
const PRESET_MINUTES: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigPreset {
    /// One-minute interval and snooze, no quiet hours.
    Fast,
    /// Production defaults.
    Normal,
    /// Quiet from 00:00 to 23:00.
    Quiet,
    /// Master switch off.
    Disabled,
}

impl ConfigPreset {
    pub const ALL: [ConfigPreset; 4] = [
        ConfigPreset::Fast,
        ConfigPreset::Normal,
        ConfigPreset::Quiet,
        ConfigPreset::Disabled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigPreset::Fast => "fast",
            ConfigPreset::Normal => "normal",
            ConfigPreset::Quiet => "quiet",
            ConfigPreset::Disabled => "disabled",
        }
    }

    /// Build the preset's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the preset fails validation.
    pub fn config(self) -> Result<Config, ConfigError> {
        let config = match self {
            ConfigPreset::Fast => Config {
                interval_minutes: PRESET_MINUTES,
                snooze_minutes: PRESET_MINUTES,
                quiet_hours: QuietHours::off(),
                ..Config::default()
            },
            ConfigPreset::Normal => Config::default(),
            ConfigPreset::Quiet => Config {
                interval_minutes: PRESET_MINUTES,
                snooze_minutes: PRESET_MINUTES,
                quiet_hours: QuietHours::new(0, 23),
                ..Config::default()
            },
            ConfigPreset::Disabled => Config {
                interval_minutes: PRESET_MINUTES,
                snooze_minutes: PRESET_MINUTES,
                enabled: false,
                ..Config::default()
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ConfigPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ConfigPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = ConfigPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown preset: {s} (available: {})", names.join(", "))
            })
    }
}
