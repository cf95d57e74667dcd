use clap::Subcommand;
use reviewnudge_core::{Config, ConfigError, ConfigPreset};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "interval_minutes", "quiet_hours.start")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value ("none" clears target_deck_id)
        value: String,
    },
    /// List all config values
    #[command(alias = "show")]
    List,
    /// Replace the whole config with a named preset (fast, normal, quiet, disabled)
    Preset {
        /// Preset name
        name: ConfigPreset,
    },
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Preset { name } => {
            let config = name.config()?;
            let path = Config::path()?;
            config.save_to(&path)?;
            println!("config set to '{name}' preset");
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
    }
    Ok(())
}
