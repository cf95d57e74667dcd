use clap::Args;
use reviewnudge_core::{Config, HostActivity, NudgeDecider};

#[derive(Args)]
pub struct StatusArgs {
    /// Host state to evaluate the phase against
    #[arg(long, default_value = "idle")]
    pub activity: HostActivity,
}

/// Print the decider state a freshly started session would have.
pub fn run(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = chrono::Local::now().naive_local();
    let decider = NudgeDecider::new(config, now);
    let snapshot = decider.snapshot(now, args.activity);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
