use clap::Args;
use reviewnudge_core::{
    ConfigStore, Event, FileConfigStore, HostActivity, MenuAction, NudgeSession, PromptChoice,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::terminal::{TerminalHost, TerminalPresenter};

/// Polling cadence of the nudge timer.
const DEFAULT_POLL_SECS: u64 = 15;

#[derive(Args)]
pub struct RunArgs {
    /// Seconds between timer ticks
    #[arg(long, default_value_t = DEFAULT_POLL_SECS)]
    pub poll_secs: u64,
}

type Session = NudgeSession<TerminalHost, TerminalPresenter, FileConfigStore>;

/// Console line typed while no prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    /// An answered card.
    Answer,
    State(HostActivity),
    Menu(MenuAction),
    Status,
    Help,
    Quit,
}

impl std::str::FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer" | "a" => Ok(ConsoleCommand::Answer),
            "review" | "browse" | "idle" => s.parse().map(ConsoleCommand::State),
            "snooze" => Ok(ConsoleCommand::Menu(MenuAction::Snooze)),
            "toggle" => Ok(ConsoleCommand::Menu(MenuAction::ToggleEnabled)),
            "reset" => Ok(ConsoleCommand::Menu(MenuAction::ResetToday)),
            "reload" => Ok(ConsoleCommand::Menu(MenuAction::ReloadConfig)),
            "status" => Ok(ConsoleCommand::Status),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

/// Console line typed while a prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptInput {
    Choice(PromptChoice),
    Help,
    Quit,
    Invalid(String),
}

impl PromptInput {
    fn parse(line: &str) -> Self {
        match line.to_ascii_lowercase().parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Quit) => return PromptInput::Quit,
            Ok(ConsoleCommand::Help) => return PromptInput::Help,
            _ => {}
        }
        match line.parse::<PromptChoice>() {
            Ok(choice) => PromptInput::Choice(choice),
            Err(e) => PromptInput::Invalid(e),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileConfigStore::default_location()?;
    let config = store.load()?;
    let session = NudgeSession::new(
        config,
        TerminalHost::default(),
        TerminalPresenter,
        store,
    );

    let poll = Duration::from_secs(args.poll_secs.max(1));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(session, poll))
}

async fn event_loop(mut session: Session, poll: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(poll_secs = poll.as_secs(), "nudge loop running");
    print_help(&session);
    print_next_due(&session);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                session.on_timer();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if handle_line(&mut session, line.trim()) == Flow::Quit {
                    break;
                }
            }
        }
    }

    info!("nudge loop stopped");
    Ok(())
}

fn handle_line(session: &mut Session, line: &str) -> Flow {
    if line.is_empty() {
        return Flow::Continue;
    }

    if session.open_prompt().is_some() {
        match PromptInput::parse(line) {
            PromptInput::Quit => return Flow::Quit,
            PromptInput::Help => println!("answer 1-4, or 'quit'"),
            PromptInput::Choice(choice) => {
                if let Some(event) = session.resolve(choice) {
                    print_event(&event);
                }
            }
            PromptInput::Invalid(e) => println!("{e}; answer 1-4"),
        }
        return Flow::Continue;
    }

    let command = match line.to_ascii_lowercase().parse::<ConsoleCommand>() {
        Ok(command) => command,
        Err(e) => {
            println!("{e}");
            return Flow::Continue;
        }
    };

    let event = match command {
        ConsoleCommand::Answer => session.on_answered_card(),
        ConsoleCommand::State(activity) => {
            session.host_mut().set_activity(activity);
            session.on_host_state_change(activity)
        }
        ConsoleCommand::Menu(action) => session.handle_menu(action),
        ConsoleCommand::Status => {
            if let Some(snapshot) = session.snapshot() {
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => println!("{json}"),
                    Err(e) => println!("error: {e}"),
                }
            }
            None
        }
        ConsoleCommand::Help => {
            print_help(session);
            None
        }
        ConsoleCommand::Quit => return Flow::Quit,
    };

    if let Some(event) = event {
        print_event(&event);
    }
    Flow::Continue
}

fn print_event(event: &Event) {
    match event {
        Event::ActivityRecorded { next_due_at, .. }
        | Event::Cancelled { next_due_at, .. }
        | Event::Snoozed { next_due_at, .. }
        | Event::ConfigReloaded { next_due_at, .. } => {
            println!("next nudge at {}", next_due_at.format("%H:%M:%S"));
        }
        Event::EnabledToggled {
            enabled: true,
            next_due_at,
            ..
        } => {
            println!("next nudge at {}", next_due_at.format("%H:%M:%S"));
        }
        Event::DisabledForToday { until, .. } => {
            println!("silent until {}", until.format("%Y-%m-%d %H:%M"));
        }
        Event::EnabledToggled { enabled: false, .. }
        | Event::TodayReset { .. }
        | Event::StateSnapshot { .. } => {}
    }
}

fn print_next_due(session: &Session) {
    let decider = session.decider();
    if decider.is_enabled() {
        println!(
            "next nudge at {} (quiet hours {})",
            decider.next_due_at().format("%H:%M:%S"),
            decider.config().quiet_hours
        );
    } else {
        println!("nudges are disabled ('toggle' to enable)");
    }
}

fn print_help(session: &Session) {
    println!("commands:");
    println!("  answer                 record an answered card");
    println!("  review | browse | idle set the host state");
    for action in MenuAction::ALL {
        let name = match action {
            MenuAction::ToggleEnabled => "toggle",
            MenuAction::Snooze => "snooze",
            MenuAction::ResetToday => "reset",
            MenuAction::ReloadConfig => "reload",
        };
        println!("  {name:<22} {}", action.label(session.config()));
    }
    println!("  status                 print the decider state as JSON");
    println!("  quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_console_commands() {
        assert_eq!("answer".parse(), Ok(ConsoleCommand::Answer));
        assert_eq!(
            "review".parse(),
            Ok(ConsoleCommand::State(HostActivity::Reviewing))
        );
        assert_eq!(
            "toggle".parse(),
            Ok(ConsoleCommand::Menu(MenuAction::ToggleEnabled))
        );
        assert_eq!("q".parse(), Ok(ConsoleCommand::Quit));
        assert!("dance".parse::<ConsoleCommand>().is_err());
    }

    #[test]
    fn quit_and_help_work_while_a_prompt_is_open() {
        assert_eq!(PromptInput::parse("quit"), PromptInput::Quit);
        assert_eq!(PromptInput::parse("Q"), PromptInput::Quit);
        assert_eq!(PromptInput::parse("help"), PromptInput::Help);
    }

    #[test]
    fn prompt_lines_map_to_choices() {
        assert_eq!(PromptInput::parse("1"), PromptInput::Choice(PromptChoice::Start));
        assert_eq!(
            PromptInput::parse("snooze"),
            PromptInput::Choice(PromptChoice::Snooze)
        );
        assert_eq!(PromptInput::parse("c"), PromptInput::Choice(PromptChoice::Cancel));
        assert!(matches!(PromptInput::parse("toggle"), PromptInput::Invalid(_)));
    }
}
