use pomodore_core::Database;

use super::CliResult;

/// Wipe the ledger, the timer and the session log. Config is kept.
pub fn run(yes: bool) -> CliResult {
    if !yes {
        return Err("refusing to reset without --yes".into());
    }
    let db = Database::open()?;
    db.clear()?;
    tracing::info!("all progress cleared");
    println!("{{\"type\": \"reset\"}}");
    Ok(())
}
