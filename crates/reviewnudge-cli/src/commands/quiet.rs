use chrono::{Local, Timelike};
use clap::Args;
use reviewnudge_core::Config;

#[derive(Args)]
pub struct QuietArgs {
    /// Hour of day to check (0-23); defaults to the current hour
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,
}

pub fn run(args: QuietArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let hour = args.hour.unwrap_or_else(|| Local::now().hour());
    let window = &config.quiet_hours;

    if window.contains_hour(hour) {
        println!("{hour:02}:00 is quiet ({window})");
    } else {
        println!("{hour:02}:00 is not quiet ({window})");
    }
    Ok(())
}
