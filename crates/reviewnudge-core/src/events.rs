use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::nudge::NudgePhase;

pub const APP_NAME: &str = "Review Nudge";

/// Every decider action produces an Event.
/// Hosts show [`Event::message`] as a transient confirmation; the CLI prints
/// events as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Review progress restarted the interval.
    ActivityRecorded {
        next_due_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    Snoozed {
        snooze_minutes: i64,
        next_due_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    DisabledForToday {
        until: NaiveDateTime,
        at: NaiveDateTime,
    },
    /// Prompt dismissed; a short fixed re-nudge is scheduled.
    Cancelled {
        next_due_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    TodayReset {
        cleared: Option<NaiveDateTime>,
    },
    EnabledToggled {
        enabled: bool,
        next_due_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    ConfigReloaded {
        next_due_at: NaiveDateTime,
        at: NaiveDateTime,
    },
    StateSnapshot {
        phase: NudgePhase,
        enabled: bool,
        next_due_at: NaiveDateTime,
        disabled_until: Option<NaiveDateTime>,
        suppressed: bool,
        quiet_hours: String,
        at: NaiveDateTime,
    },
}

impl Event {
    /// Short confirmation text for the user, if this event warrants one.
    pub fn message(&self) -> Option<String> {
        match self {
            Event::Snoozed { snooze_minutes, .. } => {
                Some(format!("Snoozed for {snooze_minutes} minutes"))
            }
            Event::DisabledForToday { .. } => Some("Disabled for today".to_string()),
            Event::TodayReset { .. } => Some("Reset for today".to_string()),
            Event::EnabledToggled { enabled, .. } => {
                let state = if *enabled { "ON" } else { "OFF" };
                Some(format!("{APP_NAME} {state}"))
            }
            Event::ConfigReloaded { .. } => Some("Settings saved".to_string()),
            Event::ActivityRecorded { .. }
            | Event::Cancelled { .. }
            | Event::StateSnapshot { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn snooze_message_names_minutes() {
        let event = Event::Snoozed {
            snooze_minutes: 5,
            next_due_at: noon(),
            at: noon(),
        };
        assert_eq!(event.message().as_deref(), Some("Snoozed for 5 minutes"));
    }

    #[test]
    fn cancel_is_silent() {
        let event = Event::Cancelled {
            next_due_at: noon(),
            at: noon(),
        };
        assert!(event.message().is_none());
    }

    #[test]
    fn toggle_message_reports_state() {
        let event = Event::EnabledToggled {
            enabled: false,
            next_due_at: noon(),
            at: noon(),
        };
        assert_eq!(event.message().as_deref(), Some("Review Nudge OFF"));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::DisabledForToday {
            until: noon(),
            at: noon(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "DisabledForToday");
        assert_eq!(json["until"], "2024-03-14T12:00:00");
    }
}
