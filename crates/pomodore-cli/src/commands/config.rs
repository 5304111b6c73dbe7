use clap::Subcommand;
use pomodore_core::modes::presets;
use pomodore_core::{Config, Mode};
use serde_json::json;

use super::{print_json, print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.active_mode", "ui.accent_color")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Preset and custom timer modes
    Modes,
    /// Create a custom timer mode
    AddMode {
        /// Display name; the id is derived from it
        name: String,
        /// Focus length in minutes
        #[arg(long, default_value = "25")]
        focus: u64,
        /// Short break length in minutes
        #[arg(long, default_value = "5")]
        short_break: u64,
        /// Long break length in minutes
        #[arg(long, default_value = "15")]
        long_break: u64,
        /// Focus cycles before a long break
        #[arg(long, default_value = "4")]
        cycles: u32,
    },
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let entries: serde_json::Map<String, serde_json::Value> = config
                .entries()
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect();
            print_json(&entries)?;
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Modes => {
            let config = Config::load()?;
            print_json(&json!({
                "active": config.active_mode().id,
                "presets": presets(),
                "custom": config.custom_modes,
            }))?;
        }
        ConfigAction::AddMode {
            name,
            focus,
            short_break,
            long_break,
            cycles,
        } => {
            let mut session = Session::open()?;
            let mode = Mode {
                focus_secs: focus * 60,
                short_break_secs: short_break * 60,
                long_break_secs: long_break * 60,
                cycles_until_long_break: cycles,
                ..Mode::custom(name)
            };
            session.config.add_custom_mode(mode.clone())?;
            session.config.save()?;
            let events = session.ledger.register_custom_mode(&session.clock);
            session.push_events(events);
            session.save()?;
            print_with_events(&session, "mode", &mode)?;
        }
    }
    Ok(())
}
