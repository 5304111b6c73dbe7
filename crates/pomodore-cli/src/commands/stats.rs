use std::path::PathBuf;

use clap::Subcommand;
use pomodore_core::score::{
    active_dates, aggregate_by_mode, aggregate_stats, calculate_streaks, cycles_by_date,
    xp_to_next_level, StatsPeriod,
};
use pomodore_core::Clock;
use serde_json::json;

use super::{print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Level, XP, streaks and focus totals
    Summary,
    /// Totals per timer mode
    Modes,
    /// Completed cycles per day
    Daily,
    /// Write all progress as JSON to a file (or stdout)
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let mut session = Session::open()?;
    let today = session.clock.today();
    let ledger = &session.ledger;

    let value = match action {
        StatsAction::Summary => {
            let streaks = calculate_streaks(&active_dates(&ledger.daily_stats), today);
            json!({
                "level": ledger.progress.level(),
                "total_xp": ledger.progress.total_xp,
                "xp_to_next_level": xp_to_next_level(ledger.progress.total_xp),
                "current_streak": streaks.current,
                "best_streak": streaks.best.max(ledger.progress.best_streak),
                "today": aggregate_stats(&ledger.daily_stats, StatsPeriod::Today, today),
                "week": aggregate_stats(&ledger.daily_stats, StatsPeriod::Week, today),
                "all": aggregate_stats(&ledger.daily_stats, StatsPeriod::All, today),
            })
        }
        StatsAction::Modes => serde_json::to_value(aggregate_by_mode(&ledger.daily_stats))?,
        StatsAction::Daily => serde_json::to_value(cycles_by_date(&ledger.daily_stats))?,
        StatsAction::Export { out } => {
            let dump = serde_json::to_string_pretty(ledger)?;
            let events = session.ledger.mark_exported(&session.clock);
            session.push_events(events);
            match out {
                Some(path) => {
                    std::fs::write(&path, dump)?;
                    json!({ "exported_to": path })
                }
                None => {
                    println!("{dump}");
                    session.save()?;
                    return Ok(());
                }
            }
        }
    };

    session.save()?;
    print_with_events(&session, "stats", &value)
}
