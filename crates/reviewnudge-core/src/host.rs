//! Collaborator traits for the host application.
//!
//! The decider never talks to the host directly. A [`NudgeSession`] reads the
//! clock and activity state through [`Host`] on every timer tick, and hands
//! prompts to a [`Presenter`].
//!
//! [`NudgeSession`]: crate::session::NudgeSession

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::nudge::NudgePrompt;

/// What the host application is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostActivity {
    #[default]
    Idle,
    /// Open but not reviewing (deck list, browser, editor).
    Browsing,
    /// In an active review session.
    Reviewing,
}

impl HostActivity {
    /// Whether nudges must stay silent.
    pub fn is_active_session(self) -> bool {
        matches!(self, HostActivity::Reviewing)
    }
}

impl std::str::FromStr for HostActivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(HostActivity::Idle),
            "browse" | "browsing" => Ok(HostActivity::Browsing),
            "review" | "reviewing" => Ok(HostActivity::Reviewing),
            other => Err(format!("unknown host state: {other}")),
        }
    }
}

/// The host application embedding the nudger.
pub trait Host {
    /// Local wall-clock time.
    fn now(&self) -> Result<NaiveDateTime, HostError> {
        Ok(Local::now().naive_local())
    }

    /// Current activity state.
    fn activity(&self) -> Result<HostActivity, HostError>;

    /// Open the study screen, selecting `target_deck_id` first when given.
    fn start_review(&mut self, target_deck_id: Option<i64>) -> Result<(), HostError>;

    /// Show a transient confirmation message.
    fn notify(&mut self, message: &str);

    /// Raise the host window before a prompt. Best effort.
    fn bring_to_front(&mut self) {}
}

/// Renders the nudge prompt.
///
/// Showing is fire-and-forget: the host reports the user's choice later
/// through [`NudgeSession::resolve`](crate::session::NudgeSession::resolve).
/// Modal presenters simply resolve right after `show` returns.
pub trait Presenter {
    fn show(&mut self, prompt: &NudgePrompt);
}
