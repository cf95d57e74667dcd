//! Session glue between the decider and its collaborators.
//!
//! A [`NudgeSession`] is the single owned object a host creates per profile.
//! The host's timer callback calls [`NudgeSession::on_timer`], its hooks call
//! the `on_*` methods, and its menu entries call [`NudgeSession::handle_menu`].
//! Nothing is registered globally.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::events::{Event, APP_NAME};
use crate::host::{Host, HostActivity, Presenter};
use crate::nudge::{NudgeDecider, NudgePrompt, PromptChoice, TickOutcome};
use crate::storage::{Config, ConfigStore};

/// Shown when the host cannot open the study screen by itself.
pub const REVIEW_START_FALLBACK: &str =
    "Could not start review automatically. Open your deck to begin.";

/// Manual actions exposed on the host's command menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    ToggleEnabled,
    Snooze,
    ResetToday,
    ReloadConfig,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ToggleEnabled,
        MenuAction::Snooze,
        MenuAction::ResetToday,
        MenuAction::ReloadConfig,
    ];

    /// Menu entry text. The snooze entry shows the configured minutes.
    pub fn label(self, config: &Config) -> String {
        match self {
            MenuAction::ToggleEnabled => format!("{APP_NAME}: Toggle Enabled"),
            MenuAction::Snooze => {
                format!("{APP_NAME}: Snooze {}m", config.snooze_label_minutes())
            }
            MenuAction::ResetToday => format!("{APP_NAME}: Reset Today"),
            MenuAction::ReloadConfig => format!("{APP_NAME}: Reload Settings"),
        }
    }
}

/// One decider bound to one host, presenter and config store.
pub struct NudgeSession<H, P, S> {
    decider: NudgeDecider,
    host: H,
    presenter: P,
    store: S,
    open_prompt: Option<NudgePrompt>,
}

impl<H: Host, P: Presenter, S: ConfigStore> NudgeSession<H, P, S> {
    pub fn new(config: Config, host: H, presenter: P, store: S) -> Self {
        let now = host.now().unwrap_or_else(|e| {
            warn!(error = %e, "host clock unavailable at startup, using system clock");
            Local::now().naive_local()
        });
        info!(
            interval_minutes = config.interval_minutes,
            quiet_hours = %config.quiet_hours,
            enabled = config.enabled,
            "nudge session started"
        );
        Self {
            decider: NudgeDecider::new(config, now),
            host,
            presenter,
            store,
            open_prompt: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn decider(&self) -> &NudgeDecider {
        &self.decider
    }

    pub fn config(&self) -> &Config {
        self.decider.config()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The prompt awaiting a [`resolve`](Self::resolve), if any.
    pub fn open_prompt(&self) -> Option<&NudgePrompt> {
        self.open_prompt.as_ref()
    }

    /// State snapshot, or `None` when the clock cannot be read.
    pub fn snapshot(&self) -> Option<Event> {
        let now = self.read_now()?;
        let activity = self.host.activity().unwrap_or_default();
        Some(self.decider.snapshot(now, activity))
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Timer callback. Presents the prompt at most once until it is resolved.
    ///
    /// A failed clock or host-state read holds the tick; the next one retries.
    pub fn on_timer(&mut self) -> TickOutcome {
        if self.open_prompt.is_some() {
            return TickOutcome::Hold;
        }
        let Some(now) = self.read_now() else {
            return TickOutcome::Hold;
        };
        let activity = match self.host.activity() {
            Ok(activity) => activity,
            Err(e) => {
                warn!(error = %e, "host state unavailable, skipping tick");
                return TickOutcome::Hold;
            }
        };

        let outcome = self.decider.on_tick(now, activity);
        if outcome == TickOutcome::Show {
            let prompt = NudgePrompt::new(self.decider.config(), self.decider.next_due_at());
            info!(due_at = %prompt.due_at, "presenting nudge");
            self.host.bring_to_front();
            self.presenter.show(&prompt);
            self.open_prompt = Some(prompt);
        }
        outcome
    }

    /// Apply the user's answer to the prompt.
    pub fn resolve(&mut self, choice: PromptChoice) -> Option<Event> {
        if self.open_prompt.take().is_none() {
            debug!(?choice, "choice received without an open prompt");
        }
        let now = self.read_now()?;

        let event = match choice {
            PromptChoice::Start => {
                let target = self.decider.config().target_deck_id;
                if let Err(e) = self.host.start_review(target) {
                    warn!(error = %e, ?target, "review start failed");
                    self.host.notify(REVIEW_START_FALLBACK);
                }
                self.decider.on_activity(now)
            }
            PromptChoice::Snooze => self.decider.on_snooze(now),
            PromptChoice::DisableToday => self.decider.on_disable_today(now),
            PromptChoice::Cancel => self.decider.on_cancel(now),
        };
        self.announce(&event);
        Some(event)
    }

    // ── Host hooks ───────────────────────────────────────────────────

    pub fn on_profile_open(&mut self) -> Option<Event> {
        let now = self.read_now()?;
        Some(self.decider.on_activity(now))
    }

    /// Fired for every answered card.
    pub fn on_answered_card(&mut self) -> Option<Event> {
        let now = self.read_now()?;
        Some(self.decider.on_activity(now))
    }

    pub fn on_host_state_change(&mut self, activity: HostActivity) -> Option<Event> {
        let now = self.read_now()?;
        self.decider.on_host_state_change(now, activity)
    }

    // ── Menu ─────────────────────────────────────────────────────────

    pub fn handle_menu(&mut self, action: MenuAction) -> Option<Event> {
        let now = self.read_now()?;

        let event = match action {
            MenuAction::ToggleEnabled => {
                let event = self.decider.on_toggle_enabled(now);
                if let Err(e) = self.store.save(self.decider.config()) {
                    warn!(error = %e, "could not persist enabled flag");
                }
                event
            }
            MenuAction::Snooze => self.decider.on_snooze(now),
            MenuAction::ResetToday => {
                let event = self.decider.on_reset_today();
                self.decider.on_activity(now);
                event
            }
            MenuAction::ReloadConfig => match self.store.load() {
                Ok(config) => self.decider.reload(config, now),
                Err(e) => {
                    warn!(error = %e, "could not reload config");
                    self.host.notify("Could not reload settings");
                    return None;
                }
            },
        };
        self.announce(&event);
        Some(event)
    }

    /// Explicit reload with an already-loaded configuration.
    pub fn reload_config(&mut self, config: Config) -> Option<Event> {
        let now = self.read_now()?;
        let event = self.decider.reload(config, now);
        self.announce(&event);
        Some(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read_now(&self) -> Option<NaiveDateTime> {
        match self.host.now() {
            Ok(now) => Some(now),
            Err(e) => {
                warn!(error = %e, "clock read failed");
                None
            }
        }
    }

    fn announce(&mut self, event: &Event) {
        if let Some(message) = event.message() {
            self.host.notify(&message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::storage::MemoryConfigStore;
    use chrono::{Duration, NaiveDate};
    use std::cell::Cell;

    struct FakeHost {
        now: Cell<NaiveDateTime>,
        activity: HostActivity,
        clock_broken: bool,
        reviews_started: Vec<Option<i64>>,
        messages: Vec<String>,
    }

    impl FakeHost {
        fn at(now: NaiveDateTime) -> Self {
            Self {
                now: Cell::new(now),
                activity: HostActivity::Idle,
                clock_broken: false,
                reviews_started: Vec::new(),
                messages: Vec::new(),
            }
        }

        fn advance(&self, minutes: i64) {
            self.now.set(self.now.get() + Duration::minutes(minutes));
        }
    }

    impl Host for FakeHost {
        fn now(&self) -> Result<NaiveDateTime, HostError> {
            if self.clock_broken {
                return Err(HostError::ClockUnavailable("test".into()));
            }
            Ok(self.now.get())
        }

        fn activity(&self) -> Result<HostActivity, HostError> {
            Ok(self.activity)
        }

        fn start_review(&mut self, target_deck_id: Option<i64>) -> Result<(), HostError> {
            self.reviews_started.push(target_deck_id);
            Ok(())
        }

        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    #[derive(Default)]
    struct CountingPresenter {
        shown: usize,
    }

    impl Presenter for CountingPresenter {
        fn show(&mut self, _prompt: &NudgePrompt) {
            self.shown += 1;
        }
    }

    fn two_pm() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn session() -> NudgeSession<FakeHost, CountingPresenter, MemoryConfigStore> {
        NudgeSession::new(
            Config::default(),
            FakeHost::at(two_pm()),
            CountingPresenter::default(),
            MemoryConfigStore::default(),
        )
    }

    #[test]
    fn prompt_is_presented_once_while_open() {
        let mut session = session();
        session.host().advance(30);

        assert_eq!(session.on_timer(), TickOutcome::Show);
        assert_eq!(session.on_timer(), TickOutcome::Hold);
        assert_eq!(session.presenter().shown, 1);
        assert!(session.open_prompt().is_some());
    }

    #[test]
    fn snooze_choice_closes_prompt_and_notifies() {
        let mut session = session();
        session.host().advance(30);
        session.on_timer();

        let event = session.resolve(PromptChoice::Snooze).unwrap();
        assert!(matches!(event, Event::Snoozed { .. }));
        assert!(session.open_prompt().is_none());
        assert_eq!(session.host().messages, vec!["Snoozed for 5 minutes"]);
        assert_eq!(
            session.decider().next_due_at(),
            two_pm() + Duration::minutes(35)
        );
    }

    #[test]
    fn start_choice_opens_target_deck_and_restarts_interval() {
        let config = Config {
            target_deck_id: Some(42),
            ..Config::default()
        };
        let mut session = NudgeSession::new(
            config,
            FakeHost::at(two_pm()),
            CountingPresenter::default(),
            MemoryConfigStore::default(),
        );
        session.host().advance(31);
        session.on_timer();
        session.resolve(PromptChoice::Start);

        assert_eq!(session.host().reviews_started, vec![Some(42)]);
        assert_eq!(
            session.decider().next_due_at(),
            two_pm() + Duration::minutes(61)
        );
    }

    #[test]
    fn broken_clock_holds_tick() {
        let mut session = session();
        session.host().advance(60);
        session.host_mut().clock_broken = true;

        assert_eq!(session.on_timer(), TickOutcome::Hold);
        assert!(session.on_answered_card().is_none());
        assert_eq!(session.presenter().shown, 0);
    }

    #[test]
    fn toggle_persists_config() {
        let mut session = session();
        session.handle_menu(MenuAction::ToggleEnabled);

        assert_eq!(session.store().save_count(), 1);
        assert!(!session.store().current().enabled);
        assert_eq!(session.host().messages, vec!["Review Nudge OFF"]);
    }

    #[test]
    fn menu_labels_follow_config() {
        let config = Config {
            snooze_minutes: 7.0,
            ..Config::default()
        };
        assert_eq!(
            MenuAction::Snooze.label(&config),
            "Review Nudge: Snooze 7m"
        );
    }
}
