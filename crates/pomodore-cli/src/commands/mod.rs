pub mod achievements;
pub mod config;
pub mod quests;
pub mod reset;
pub mod stats;
pub mod task;
pub mod timer;

use pomodore_core::{Clock, Config, Database, Event, Ledger, SystemClock};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs, loaded once per invocation.
///
/// Opening a session rolls quests over to today and settles overdue task
/// penalties, so every command sees current state.
pub struct Session {
    pub db: Database,
    pub config: Config,
    pub ledger: Ledger,
    pub clock: SystemClock,
    /// Events produced while opening the session.
    pub events: Vec<Event>,
}

impl Session {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open()?;
        let config = Config::load()?;
        let mut ledger = db.load_ledger()?;
        let clock = SystemClock;

        ledger.refresh_quests(clock.today());
        let events = ledger.apply_overdue_penalties(&clock);

        Ok(Self {
            db,
            config,
            ledger,
            clock,
            events,
        })
    }

    pub fn save(&self) -> CliResult {
        self.db.save_ledger(&self.ledger)?;
        Ok(())
    }

    /// Move events into the session's pending list.
    pub fn push_events(&mut self, events: Vec<Event>) {
        self.events.extend(events);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print `value` with the session's events attached.
pub fn print_with_events<T: Serialize>(session: &Session, key: &str, value: &T) -> CliResult {
    let mut out = serde_json::Map::new();
    out.insert(key.to_string(), serde_json::to_value(value)?);
    out.insert("events".to_string(), serde_json::to_value(&session.events)?);
    print_json(&out)
}
