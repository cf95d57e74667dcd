//! Daily quiet window during which nudges are suppressed.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUIET_START: u8 = 22;
pub const DEFAULT_QUIET_END: u8 = 7;

/// Quiet hours policy.
///
/// `start` and `end` are hours of the day (0-23). A window whose start is
/// after its end wraps past midnight, so 22-7 covers 22:00 through 06:59.
/// A window with `start == end` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub start: u8,
    pub end: u8,
}

fn default_true() -> bool {
    true
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: true,
            start: DEFAULT_QUIET_START,
            end: DEFAULT_QUIET_END,
        }
    }
}

impl QuietHours {
    pub fn new(start: u8, end: u8) -> Self {
        Self {
            enabled: true,
            start,
            end,
        }
    }

    /// A policy that never matches.
    pub fn off() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Check if the given hour of day falls inside the window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if !self.enabled {
            return false;
        }

        let start = self.start as u32;
        let end = self.end as u32;

        // Overnight window (e.g., 22:00 - 07:00)
        if start > end {
            return hour >= start || hour < end;
        }

        // Daytime window (e.g., 12:00 - 17:00)
        start <= hour && hour < end
    }

    /// Check if a local wall-clock time is within quiet hours.
    pub fn is_quiet_at(&self, time: NaiveDateTime) -> bool {
        self.contains_hour(time.hour())
    }

    /// Whether the window can ever match.
    pub fn is_effective(&self) -> bool {
        self.enabled && self.start != self.end
    }
}

impl std::fmt::Display for QuietHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_effective() {
            write!(f, "{:02}:00-{:02}:00", self.start, self.end)
        } else {
            write!(f, "off")
        }
    }
}
