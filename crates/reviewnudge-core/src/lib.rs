//! # Review Nudge Core Library
//!
//! This library decides when to interrupt an idle study application with a
//! "time to review" reminder. The host application (or the bundled CLI) owns
//! the timer and the dialog; this crate owns the decision.
//!
//! ## Architecture
//!
//! - **Decider**: A wall-clock-based state machine that requires the caller
//!   to invoke `on_tick()` on a fixed polling cadence
//! - **Quiet hours**: Daily suppression window, possibly wrapping midnight
//! - **Storage**: Lenient TOML-based configuration
//! - **Session**: Owned glue binding the decider to a host, a presenter and a
//!   config store
//!
//! ## Key Components
//!
//! - [`NudgeDecider`]: Core decision state machine
//! - [`NudgeSession`]: Timer callback, host hooks and menu actions
//! - [`Config`]: Nudge configuration management
//! - [`Host`] / [`Presenter`]: Traits implemented by the embedding application

pub mod error;
pub mod events;
pub mod host;
pub mod nudge;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, HostError};
pub use events::Event;
pub use host::{Host, HostActivity, Presenter};
pub use nudge::{NudgeDecider, NudgePhase, NudgePrompt, PromptChoice, QuietHours, TickOutcome};
pub use session::{MenuAction, NudgeSession};
pub use storage::{Config, ConfigPreset, ConfigStore, FileConfigStore, MemoryConfigStore};
