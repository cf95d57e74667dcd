//! Terminal stand-ins for the host application and the popup.

use std::io::Write;

use reviewnudge_core::{Host, HostActivity, HostError, NudgePrompt, Presenter};

/// Host whose activity state is driven by console commands.
#[derive(Debug, Default)]
pub struct TerminalHost {
    activity: HostActivity,
}

impl TerminalHost {
    pub fn set_activity(&mut self, activity: HostActivity) {
        self.activity = activity;
    }
}

impl Host for TerminalHost {
    fn activity(&self) -> Result<HostActivity, HostError> {
        Ok(self.activity)
    }

    fn start_review(&mut self, target_deck_id: Option<i64>) -> Result<(), HostError> {
        match target_deck_id {
            Some(deck) => println!("» starting review of deck {deck}"),
            None => println!("» starting review of the current deck"),
        }
        self.activity = HostActivity::Reviewing;
        Ok(())
    }

    fn notify(&mut self, message: &str) {
        println!("» {message}");
    }

    fn bring_to_front(&mut self) {
        // Terminal bell.
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}

/// Prints the prompt; the answer arrives as the next console line.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show(&mut self, prompt: &NudgePrompt) {
        println!();
        println!("=== {} ===", prompt.title);
        println!("{}", prompt.text);
        for (i, (_, label)) in prompt.choices().iter().enumerate() {
            println!("  [{}] {label}", i + 1);
        }
        print!("choice> ");
        let _ = std::io::stdout().flush();
    }
}
