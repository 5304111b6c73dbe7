use std::time::Duration;

use clap::Subcommand;
use pomodore_core::storage::SessionRecord;
use pomodore_core::timer::{format_time, TimerAction, TimerState};
use pomodore_core::{Clock, Tick, TimerEngine};

use super::{print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum TimerCommand {
    /// Start the loaded phase
    Start,
    /// Pause the running phase
    Pause,
    /// Resume a paused phase
    Resume,
    /// Jump to the next phase without completing this one
    Skip,
    /// Restore the current phase's full duration
    Reset,
    /// Add one minute to the remaining time
    AddMinute,
    /// Remove one minute (never below one minute)
    SubtractMinute,
    /// Tick the timer and print its state as JSON
    Status,
    /// Switch to another preset or custom mode and start over
    Mode {
        /// Mode id, e.g. "traditional" or "animedoro"
        id: String,
    },
    /// Tick once per second until the current phase completes, resuming it if paused
    Run,
    /// Completed phases, newest first
    History {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn load_engine(session: &Session) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    Ok(session
        .db
        .load_timer()?
        .unwrap_or_else(|| TimerEngine::new(session.config.active_mode())))
}

/// Feed a tick through the ledger and log the completion, if any.
fn settle(session: &mut Session, engine: &mut TimerEngine, tick: &Tick) -> CliResult {
    let Some(completion) = tick.completion else {
        return Ok(());
    };
    let mode = engine.mode().clone();
    let events = session.ledger.handle_tick(tick, &mode, &session.clock);
    session.push_events(events);
    session.db.record_session(&SessionRecord {
        phase: completion.completed,
        mode_id: mode.id.clone(),
        duration_secs: mode.duration_for(completion.completed),
        completed_at: session.clock.local_now(),
    })?;

    if session.config.timer.auto_start_breaks && completion.was_focus() {
        engine.start(&session.clock);
    }
    Ok(())
}

/// Tick once per second until the phase completes or the engine stops running.
fn run_until_complete(session: &mut Session, engine: &mut TimerEngine) -> CliResult {
    loop {
        let tick = engine.tick(&session.clock);
        let snapshot = &tick.snapshot;
        eprint!("\r{} {:?}  ", format_time(snapshot.remaining_secs), snapshot.phase);
        if tick.completion.is_some() {
            eprintln!();
            return settle(session, engine, &tick);
        }
        if engine.state() != TimerState::Running {
            eprintln!();
            return Ok(());
        }
        std::thread::sleep(Duration::from_secs(1));
    }
}

pub fn run(command: TimerCommand) -> CliResult {
    let mut session = Session::open()?;
    let mut engine = load_engine(&session)?;

    match command {
        TimerCommand::History { limit } => {
            let sessions = session.db.recent_sessions(limit)?;
            session.save()?;
            return print_with_events(&session, "sessions", &sessions);
        }
        TimerCommand::Mode { id } => {
            let mode = session
                .config
                .find_mode(&id)
                .ok_or_else(|| format!("unknown mode: {id}"))?;
            engine.set_mode(mode);
            session.config.timer.active_mode = id;
            session.config.save()?;
        }
        TimerCommand::Run => {
            // A phase that ran out while nobody was ticking is settled, not rerun.
            let pending = engine.tick(&session.clock);
            if pending.completion.is_some() {
                settle(&mut session, &mut engine, &pending)?;
            } else {
                match engine.state() {
                    TimerState::Paused => {
                        engine.resume(&session.clock);
                    }
                    TimerState::Idle | TimerState::Finished => {
                        engine.start(&session.clock);
                    }
                    TimerState::Running => {}
                }
                session.db.save_timer(&engine)?;
                run_until_complete(&mut session, &mut engine)?;
            }
        }
        other => {
            let action = match other {
                TimerCommand::Start => TimerAction::Start,
                TimerCommand::Pause => TimerAction::Pause,
                TimerCommand::Resume => TimerAction::Resume,
                TimerCommand::Skip => TimerAction::Skip,
                TimerCommand::Reset => TimerAction::Reset,
                TimerCommand::AddMinute => TimerAction::AddMinute,
                TimerCommand::SubtractMinute => TimerAction::SubtractMinute,
                _ => TimerAction::Tick,
            };
            // A pending completion is settled before any other command.
            let tick = engine.tick(&session.clock);
            settle(&mut session, &mut engine, &tick)?;
            if action != TimerAction::Tick {
                engine.apply(action, &session.clock);
            }
        }
    }

    session.db.save_timer(&engine)?;
    session.save()?;
    print_with_events(&session, "timer", &engine.snapshot())
}
