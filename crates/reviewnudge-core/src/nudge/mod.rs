mod decider;
mod prompt;
mod quiet_hours;

pub use decider::{
    start_of_next_day, DeciderState, NudgeDecider, NudgePhase, TickOutcome, CANCEL_DELAY,
};
pub use prompt::{NudgePrompt, PromptChoice, PROMPT_TEXT};
pub use quiet_hours::{QuietHours, DEFAULT_QUIET_END, DEFAULT_QUIET_START};
