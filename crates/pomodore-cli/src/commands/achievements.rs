use clap::Subcommand;
use pomodore_core::score::ACHIEVEMENTS;
use serde_json::json;

use super::{print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// Full catalog with unlock state
    List {
        /// Only unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },
}

pub fn run(action: AchievementsAction) -> CliResult {
    let session = Session::open()?;

    let value = match action {
        AchievementsAction::List { unlocked } => {
            let entries: Vec<_> = ACHIEVEMENTS
                .iter()
                .map(|a| (a, session.ledger.unlocked.contains(a.id)))
                .filter(|(_, is_unlocked)| !unlocked || *is_unlocked)
                .map(|(a, is_unlocked)| {
                    json!({
                        "achievement": a,
                        "unlocked": is_unlocked,
                    })
                })
                .collect();
            json!({
                "unlocked_count": session.ledger.unlocked.len(),
                "total": ACHIEVEMENTS.len(),
                "entries": entries,
            })
        }
    };

    session.save()?;
    print_with_events(&session, "achievements", &value)
}
