use clap::Subcommand;
use pomodore_core::quest::calculate_total_quest_xp;
use serde_json::json;

use super::{print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum QuestsAction {
    /// Current daily and weekly quests
    List,
}

pub fn run(action: QuestsAction) -> CliResult {
    let session = Session::open()?;
    let ledger = &session.ledger;

    let value = match action {
        QuestsAction::List => json!({
            "daily": ledger.daily_quests,
            "weekly": ledger.weekly_quests,
            "earned_xp": calculate_total_quest_xp(&ledger.daily_quests)
                + calculate_total_quest_xp(&ledger.weekly_quests),
        }),
    };

    session.save()?;
    print_with_events(&session, "quests", &value)
}
