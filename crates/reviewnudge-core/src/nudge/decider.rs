//! Nudge decider implementation.
//!
//! The decider is a wall-clock-based state machine. It does not use internal
//! threads or read the clock itself - the caller passes `now` into every
//! operation and is responsible for calling `on_tick()` periodically.
//!
//! ## Phases
//!
//! ```text
//! Idle -> Due -> (snooze | cancel | start | disable-today) -> Idle
//!   \-> SuppressedByActivity | SuppressedByQuiet | SuppressedByDisable | Disabled
//! ```
//!
//! Suppression predicates are checked in that order; `Due` is reached only
//! when none of them hold and `now >= next_due_at`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut decider = NudgeDecider::new(config, now);
//! // On every poll:
//! if decider.on_tick(now, host_activity) == TickOutcome::Show {
//!     // present the prompt, then apply the user's choice
//!     decider.on_snooze(now);
//! }
//! ```

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;
use crate::host::HostActivity;
use crate::storage::Config;

/// Re-nudge delay after the user dismisses the prompt with Cancel.
///
/// Policy constant; unrelated to the configurable snooze.
pub const CANCEL_DELAY: Duration = Duration::minutes(2);

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickOutcome {
    /// Do nothing this tick.
    Hold,
    /// Present the nudge.
    Show,
}

/// Observable phase of the decider at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgePhase {
    /// Waiting for `next_due_at`.
    Idle,
    /// Nudge should be shown.
    Due,
    /// Host is in an active review session.
    SuppressedByActivity,
    /// Inside the quiet-hours window.
    SuppressedByQuiet,
    /// User opted out for the rest of the day.
    SuppressedByDisable,
    /// Master switch is off.
    Disabled,
}

impl NudgePhase {
    pub fn outcome(self) -> TickOutcome {
        match self {
            NudgePhase::Due => TickOutcome::Show,
            _ => TickOutcome::Hold,
        }
    }
}

/// Temporal state owned by the decider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeciderState {
    /// When the next nudge becomes due.
    pub next_due_at: NaiveDateTime,
    /// Set by "disable for today": start of the following calendar day.
    pub disabled_until: Option<NaiveDateTime>,
    /// True while the host was last seen in an active review.
    pub suppressed: bool,
}

/// Core decision state machine.
#[derive(Debug, Clone)]
pub struct NudgeDecider {
    config: Config,
    state: DeciderState,
}

impl NudgeDecider {
    /// Create a decider whose first nudge is due one interval after `now`.
    pub fn new(config: Config, now: NaiveDateTime) -> Self {
        let next_due_at = now + config.interval();
        Self {
            config,
            state: DeciderState {
                next_due_at,
                disabled_until: None,
                suppressed: false,
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &DeciderState {
        &self.state
    }

    pub fn next_due_at(&self) -> NaiveDateTime {
        self.state.next_due_at
    }

    pub fn disabled_until(&self) -> Option<NaiveDateTime> {
        self.state.disabled_until
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn is_quiet_at(&self, now: NaiveDateTime) -> bool {
        self.config.quiet_hours.is_quiet_at(now)
    }

    /// Evaluate the phase at `now` without mutating anything.
    pub fn phase(&self, now: NaiveDateTime, host: HostActivity) -> NudgePhase {
        if !self.config.enabled {
            return NudgePhase::Disabled;
        }
        if host.is_active_session() {
            return NudgePhase::SuppressedByActivity;
        }
        if self.is_quiet_at(now) {
            return NudgePhase::SuppressedByQuiet;
        }
        if matches!(self.state.disabled_until, Some(until) if now < until) {
            return NudgePhase::SuppressedByDisable;
        }
        if now < self.state.next_due_at {
            return NudgePhase::Idle;
        }
        NudgePhase::Due
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: NaiveDateTime, host: HostActivity) -> Event {
        Event::StateSnapshot {
            phase: self.phase(now, host),
            enabled: self.config.enabled,
            next_due_at: self.state.next_due_at,
            disabled_until: self.state.disabled_until,
            suppressed: self.state.suppressed,
            quiet_hours: self.config.quiet_hours.to_string(),
            at: now,
        }
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// Call periodically. Returns [`TickOutcome::Show`] when the nudge is due.
    ///
    /// `next_due_at` is left untouched; it only moves when the prompt is
    /// resolved through one of the actions below.
    pub fn on_tick(&mut self, now: NaiveDateTime, host: HostActivity) -> TickOutcome {
        self.state.suppressed = host.is_active_session();

        if matches!(self.state.disabled_until, Some(until) if now >= until) {
            debug!("disable-for-today expired");
            self.state.disabled_until = None;
        }

        let phase = self.phase(now, host);
        debug!(?phase, next_due_at = %self.state.next_due_at, "tick");
        phase.outcome()
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Review progress: restart the interval from `now`.
    pub fn on_activity(&mut self, now: NaiveDateTime) -> Event {
        self.state.next_due_at = now + self.config.interval();
        Event::ActivityRecorded {
            next_due_at: self.state.next_due_at,
            at: now,
        }
    }

    /// Host changed state. Entering a review counts as activity.
    pub fn on_host_state_change(
        &mut self,
        now: NaiveDateTime,
        host: HostActivity,
    ) -> Option<Event> {
        self.state.suppressed = host.is_active_session();
        if host.is_active_session() {
            Some(self.on_activity(now))
        } else {
            None
        }
    }

    pub fn on_snooze(&mut self, now: NaiveDateTime) -> Event {
        self.state.next_due_at = now + self.config.snooze_duration();
        info!(next_due_at = %self.state.next_due_at, "snoozed");
        Event::Snoozed {
            snooze_minutes: self.config.snooze_label_minutes(),
            next_due_at: self.state.next_due_at,
            at: now,
        }
    }

    /// Suppress until the start of the next calendar day.
    pub fn on_disable_today(&mut self, now: NaiveDateTime) -> Event {
        let until = start_of_next_day(now);
        self.state.disabled_until = Some(until);
        info!(%until, "disabled for today");
        Event::DisabledForToday { until, at: now }
    }

    /// Dismissed without choosing: nudge again after [`CANCEL_DELAY`].
    pub fn on_cancel(&mut self, now: NaiveDateTime) -> Event {
        self.state.next_due_at = now + CANCEL_DELAY;
        debug!(next_due_at = %self.state.next_due_at, "prompt cancelled");
        Event::Cancelled {
            next_due_at: self.state.next_due_at,
            at: now,
        }
    }

    /// Clear a "disable for today".
    pub fn on_reset_today(&mut self) -> Event {
        let cleared = self.state.disabled_until.take();
        info!(?cleared, "reset for today");
        Event::TodayReset { cleared }
    }

    /// Flip the master switch. Turning it on restarts the interval.
    pub fn on_toggle_enabled(&mut self, now: NaiveDateTime) -> Event {
        self.config.enabled = !self.config.enabled;
        if self.config.enabled {
            self.state.next_due_at = now + self.config.interval();
        }
        info!(enabled = self.config.enabled, "toggled");
        Event::EnabledToggled {
            enabled: self.config.enabled,
            next_due_at: self.state.next_due_at,
            at: now,
        }
    }

    /// Replace the configuration and restart the interval.
    pub fn reload(&mut self, config: Config, now: NaiveDateTime) -> Event {
        self.config = config;
        self.state.next_due_at = now + self.config.interval();
        info!(next_due_at = %self.state.next_due_at, "config reloaded");
        Event::ConfigReloaded {
            next_due_at: self.state.next_due_at,
            at: now,
        }
    }
}

/// Midnight at the start of the day after `now`.
pub fn start_of_next_day(now: NaiveDateTime) -> NaiveDateTime {
    let date = now.date();
    date.succ_opt().unwrap_or(date).and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nudge::QuietHours;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn decider_at(now: NaiveDateTime) -> NudgeDecider {
        NudgeDecider::new(Config::default(), now)
    }

    #[test]
    fn first_nudge_is_one_interval_out() {
        let decider = decider_at(at(14, 0));
        assert_eq!(decider.next_due_at(), at(14, 30));
        assert_eq!(decider.disabled_until(), None);
        assert!(!decider.state().suppressed);
    }

    #[test]
    fn tick_before_due_holds() {
        let mut decider = decider_at(at(14, 0));
        assert_eq!(decider.on_tick(at(14, 29), HostActivity::Idle), TickOutcome::Hold);
        assert_eq!(decider.on_tick(at(14, 30), HostActivity::Idle), TickOutcome::Show);
    }

    #[test]
    fn show_leaves_due_time_unchanged() {
        let mut decider = decider_at(at(14, 0));
        assert_eq!(decider.on_tick(at(14, 40), HostActivity::Idle), TickOutcome::Show);
        assert_eq!(decider.next_due_at(), at(14, 30));
        assert_eq!(decider.on_tick(at(14, 41), HostActivity::Idle), TickOutcome::Show);
    }

    #[test]
    fn active_review_suppresses() {
        let mut decider = decider_at(at(14, 0));
        assert_eq!(
            decider.on_tick(at(15, 0), HostActivity::Reviewing),
            TickOutcome::Hold
        );
        assert!(decider.state().suppressed);
        assert_eq!(
            decider.phase(at(15, 0), HostActivity::Reviewing),
            NudgePhase::SuppressedByActivity
        );

        assert_eq!(decider.on_tick(at(15, 0), HostActivity::Browsing), TickOutcome::Show);
        assert!(!decider.state().suppressed);
    }

    #[test]
    fn disabled_config_reports_disabled_phase() {
        let config = Config {
            enabled: false,
            ..Config::default()
        };
        let mut decider = NudgeDecider::new(config, at(14, 0));
        assert_eq!(decider.phase(at(18, 0), HostActivity::Idle), NudgePhase::Disabled);
        assert_eq!(decider.on_tick(at(18, 0), HostActivity::Idle), TickOutcome::Hold);
    }

    #[test]
    fn quiet_hours_suppress_overdue_nudge() {
        let mut decider = decider_at(at(21, 0));
        assert_eq!(decider.on_tick(at(23, 30), HostActivity::Idle), TickOutcome::Hold);
        assert_eq!(
            decider.phase(at(23, 30), HostActivity::Idle),
            NudgePhase::SuppressedByQuiet
        );
    }

    #[test]
    fn snooze_scenario() {
        let mut decider = decider_at(at(14, 0));
        assert_eq!(decider.on_tick(at(14, 30), HostActivity::Idle), TickOutcome::Show);

        let event = decider.on_snooze(at(14, 30));
        assert_eq!(decider.next_due_at(), at(14, 35));
        assert_eq!(event.message().as_deref(), Some("Snoozed for 5 minutes"));

        assert_eq!(decider.on_tick(at(14, 34), HostActivity::Idle), TickOutcome::Hold);
        assert_eq!(decider.on_tick(at(14, 36), HostActivity::Idle), TickOutcome::Show);
    }

    #[test]
    fn cancel_uses_fixed_delay_not_snooze() {
        let config = Config {
            snooze_minutes: 15.0,
            ..Config::default()
        };
        let mut decider = NudgeDecider::new(config, at(14, 0));
        decider.on_cancel(at(14, 30));
        assert_eq!(decider.next_due_at(), at(14, 32));
    }

    #[test]
    fn disable_today_lasts_until_midnight() {
        let mut decider = decider_at(at(9, 0));
        let event = decider.on_disable_today(at(10, 0));

        let midnight = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(decider.disabled_until(), Some(midnight));
        assert_eq!(event, Event::DisabledForToday { until: midnight, at: at(10, 0) });
        assert_eq!(
            decider.phase(at(20, 0), HostActivity::Idle),
            NudgePhase::SuppressedByDisable
        );
    }

    #[test]
    fn expired_disable_is_dropped_on_tick() {
        let config = Config {
            quiet_hours: QuietHours::off(),
            ..Config::default()
        };
        let mut decider = NudgeDecider::new(config, at(9, 0));
        decider.on_disable_today(at(10, 0));

        let next_morning = start_of_next_day(at(10, 0)) + Duration::minutes(5);
        assert_eq!(decider.on_tick(next_morning, HostActivity::Idle), TickOutcome::Show);
        assert_eq!(decider.disabled_until(), None);
    }

    #[test]
    fn reset_today_clears_disable() {
        let mut decider = decider_at(at(9, 0));
        decider.on_disable_today(at(10, 0));
        let event = decider.on_reset_today();

        assert_eq!(decider.disabled_until(), None);
        assert_eq!(
            event,
            Event::TodayReset {
                cleared: Some(start_of_next_day(at(10, 0)))
            }
        );
        assert_eq!(decider.on_tick(at(10, 0), HostActivity::Idle), TickOutcome::Show);
    }

    #[test]
    fn toggle_on_restarts_interval() {
        let mut decider = decider_at(at(9, 0));
        decider.on_toggle_enabled(at(9, 10));
        assert!(!decider.is_enabled());
        assert_eq!(decider.next_due_at(), at(9, 30));

        decider.on_toggle_enabled(at(12, 0));
        assert!(decider.is_enabled());
        assert_eq!(decider.next_due_at(), at(12, 30));
    }

    #[test]
    fn entering_review_counts_as_activity() {
        let mut decider = decider_at(at(9, 0));
        let event = decider.on_host_state_change(at(9, 20), HostActivity::Reviewing);
        assert!(matches!(event, Some(Event::ActivityRecorded { .. })));
        assert_eq!(decider.next_due_at(), at(9, 50));
        assert!(decider.state().suppressed);

        assert!(decider
            .on_host_state_change(at(9, 25), HostActivity::Idle)
            .is_none());
        assert_eq!(decider.next_due_at(), at(9, 50));
    }

    #[test]
    fn reload_applies_new_interval() {
        let mut decider = decider_at(at(9, 0));
        let config = Config {
            interval_minutes: 10.0,
            ..Config::default()
        };
        decider.reload(config, at(9, 5));
        assert_eq!(decider.next_due_at(), at(9, 15));
    }

    #[test]
    fn start_of_next_day_handles_month_end() {
        let late = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(
            start_of_next_day(late),
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
