//! Reference orchestrator.
//!
//! The engines only compute; [`Ledger`] is the state an application keeps
//! between runs and the glue that feeds timer completions into the score,
//! quest and task engines. Every reward it applies is reported as an
//! [`Event`].
//!
//! Focus completion pipeline, in order:
//!
//! ```text
//! daily stat += 1 ─> streak refresh ─> focus XP ─> achievements ─> quests ─> task link
//! ```

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::dates::week_start;
use crate::error::ValidationError;
use crate::events::{Event, XpSource};
use crate::modes::Mode;
use crate::quest::{apply_updates, ensure_current, quest_progress_for_focus, Quest, QuestScope};
use crate::score::{
    achievement_by_id, active_dates, aggregate_stats, calculate_streaks, calculate_xp_for_focus,
    check_achievements, check_task_achievements, record_cycle, AchievementContext, DailyStat,
    StatsPeriod, TaskAchievementContext, UserProgress,
};
use crate::task::{
    self, create_subtasks, create_task, get_tasks_for_penalty, CreateTaskInput, Subtask, Task,
    TaskStatus,
};
use crate::timer::Tick;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub progress: UserProgress,
    pub daily_stats: Vec<DailyStat>,
    pub unlocked: BTreeSet<String>,
    pub modes_used: BTreeSet<String>,
    pub has_custom_mode: bool,
    pub daily_quests: Vec<Quest>,
    pub weekly_quests: Vec<Quest>,
    pub tasks: Vec<Task>,
    pub subtasks: Vec<Subtask>,
    pub active_task_id: Option<String>,
    pub exported: bool,
}

fn not_found(kind: &'static str, id: &str) -> ValidationError {
    ValidationError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wipe all progress, history, quests and tasks.
    pub fn reset(&mut self) {
        info!("ledger reset");
        *self = Ledger::default();
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Subtasks of one task in manual order.
    pub fn subtasks_for(&self, task_id: &str) -> Vec<Subtask> {
        let mut subtasks: Vec<Subtask> = self
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id)
            .cloned()
            .collect();
        subtasks.sort_by_key(|s| s.order);
        subtasks
    }

    pub fn total_focus_cycles(&self, today: NaiveDate) -> u64 {
        aggregate_stats(&self.daily_stats, StatsPeriod::All, today).cycles
    }

    fn active_days_in_week(&self, today: NaiveDate) -> u32 {
        let monday = week_start(today);
        active_dates(&self.daily_stats)
            .into_iter()
            .filter(|d| *d >= monday && *d <= today)
            .count() as u32
    }

    fn task_index(&self, task_id: &str) -> Result<usize, ValidationError> {
        self.tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| not_found("task", task_id))
    }

    // ── XP ───────────────────────────────────────────────────────────

    fn award(&mut self, amount: i64, source: XpSource, at: NaiveDateTime, events: &mut Vec<Event>) {
        if amount == 0 {
            return;
        }
        self.progress.apply_xp(amount);
        debug!(amount, total = self.progress.total_xp, "xp applied");
        events.push(Event::XpAwarded {
            amount,
            source,
            total_xp: self.progress.total_xp,
            at,
        });
    }

    fn unlock(&mut self, id: &str, at: NaiveDateTime, events: &mut Vec<Event>) {
        let Some(achievement) = achievement_by_id(id) else {
            return;
        };
        if !self.unlocked.insert(id.to_string()) {
            return;
        }
        info!(achievement = id, "achievement unlocked");
        events.push(Event::AchievementUnlocked {
            id: id.to_string(),
            xp: achievement.xp,
            at,
        });
        self.award(
            achievement.xp as i64,
            XpSource::Achievement { id: id.to_string() },
            at,
            events,
        );
    }

    // ── Timer completions ────────────────────────────────────────────

    /// React to one timer tick. Only a completed focus phase earns rewards;
    /// break completions are reported and otherwise ignored.
    pub fn handle_tick(&mut self, tick: &Tick, mode: &Mode, clock: &dyn Clock) -> Vec<Event> {
        let Some(completion) = tick.completion else {
            return Vec::new();
        };
        let at = clock.local_now();
        let mut events = vec![Event::PhaseCompleted {
            phase: completion.completed,
            next: completion.next,
            completed_cycles: completion.completed_cycles,
            at,
        }];
        if completion.was_focus() {
            events.extend(self.record_focus_completion(mode, clock));
        }
        events
    }

    /// Apply every consequence of one completed focus phase.
    pub fn record_focus_completion(&mut self, mode: &Mode, clock: &dyn Clock) -> Vec<Event> {
        let now = clock.local_now();
        let today = now.date();
        let mut events = Vec::new();

        // XP uses the streak as it stood before this completion.
        let prior_streak = calculate_streaks(&active_dates(&self.daily_stats), today).current;

        record_cycle(&mut self.daily_stats, today, &mode.id, mode.focus_minutes());
        self.modes_used.insert(mode.id.clone());
        if mode.is_custom {
            self.has_custom_mode = true;
        }

        let streaks = calculate_streaks(&active_dates(&self.daily_stats), today);
        self.progress.current_streak = streaks.current;
        self.progress.best_streak = self.progress.best_streak.max(streaks.best);
        self.progress.last_activity_date = Some(today);

        let xp = calculate_xp_for_focus(mode, prior_streak);
        self.award(
            xp as i64,
            XpSource::Focus {
                mode_id: mode.id.clone(),
                streak: prior_streak,
            },
            now,
            &mut events,
        );

        self.evaluate_achievements(Some(now), now, &mut events);
        self.advance_quests(mode, now, &mut events);
        self.link_active_task(now, &mut events);

        info!(mode = %mode.id, xp, streak = streaks.current, "focus completion recorded");
        events
    }

    /// `completion_time` is set when a focus completion triggered the check.
    fn evaluate_achievements(
        &mut self,
        completion_time: Option<NaiveDateTime>,
        now: NaiveDateTime,
        events: &mut Vec<Event>,
    ) {
        let today = now.date();
        let ids = check_achievements(&AchievementContext {
            daily_stats: &self.daily_stats,
            unlocked_ids: &self.unlocked,
            total_focus_cycles: self.total_focus_cycles(today),
            modes_used: &self.modes_used,
            has_custom_mode: self.has_custom_mode,
            completion_time,
            today,
        });
        for id in ids {
            self.unlock(id, now, events);
        }
    }

    /// Roll quests over to the period containing `today`.
    pub fn refresh_quests(&mut self, today: NaiveDate) {
        self.daily_quests = ensure_current(&self.daily_quests, QuestScope::daily(today));
        self.weekly_quests = ensure_current(&self.weekly_quests, QuestScope::weekly(today));
    }

    fn advance_quests(&mut self, mode: &Mode, now: NaiveDateTime, events: &mut Vec<Event>) {
        let today = now.date();
        self.refresh_quests(today);
        let active_days = self.active_days_in_week(today);
        let updates = quest_progress_for_focus(mode.focus_minutes(), now, active_days);

        let mut completed = apply_updates(&mut self.daily_quests, &updates);
        completed.extend(apply_updates(&mut self.weekly_quests, &updates));
        for quest in completed {
            info!(quest = %quest.id, "quest completed");
            events.push(Event::QuestCompleted {
                id: quest.id.clone(),
                xp: quest.xp_reward,
                at: now,
            });
            self.award(
                quest.xp_reward as i64,
                XpSource::Quest { id: quest.id },
                now,
                events,
            );
        }
    }

    fn link_active_task(&mut self, now: NaiveDateTime, events: &mut Vec<Event>) {
        let Some(task_id) = self.active_task_id.clone() else {
            return;
        };
        let Some(active) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        if task::link_focus_cycle(active) {
            events.push(Event::CycleLinked {
                task_id,
                linked_cycles: active.linked_cycles,
                at: now,
            });
        }
    }

    // ── Modes and manual unlocks ─────────────────────────────────────

    /// Note that the user created a custom mode.
    pub fn register_custom_mode(&mut self, clock: &dyn Clock) -> Vec<Event> {
        self.has_custom_mode = true;
        let mut events = Vec::new();
        self.evaluate_achievements(None, clock.local_now(), &mut events);
        events
    }

    /// Unlock a catalog achievement that no rule evaluates. Unknown or
    /// already unlocked ids produce no events.
    pub fn unlock_manual(&mut self, id: &str, clock: &dyn Clock) -> Vec<Event> {
        let mut events = Vec::new();
        self.unlock(id, clock.local_now(), &mut events);
        events
    }

    pub fn mark_exported(&mut self, clock: &dyn Clock) -> Vec<Event> {
        self.exported = true;
        self.unlock_manual("export_data", clock)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Create a task (optionally with subtasks) at the end of the manual order.
    pub fn add_task(
        &mut self,
        input: CreateTaskInput,
        subtask_titles: &[String],
        clock: &dyn Clock,
    ) -> Result<Task, ValidationError> {
        if input.title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        let mut task = create_task(input, clock);
        task.sort_order = self.tasks.iter().map(|t| t.sort_order + 1).max().unwrap_or(0);
        self.subtasks
            .extend(create_subtasks(&task.id, subtask_titles, task.xp_reward));
        debug!(task = %task.id, effort = %task.effort, "task added");
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn add_subtask(
        &mut self,
        task_id: &str,
        title: &str,
    ) -> Result<Vec<Subtask>, ValidationError> {
        let idx = self.task_index(task_id)?;
        if title.trim().is_empty() {
            return Err(ValidationError::invalid("title", "must not be empty"));
        }
        let next = task::add_subtask(&self.tasks[idx], &self.subtasks_for(task_id), title);
        self.replace_subtasks(task_id, next.clone());
        Ok(next)
    }

    pub fn remove_subtask(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        clock: &dyn Clock,
    ) -> Result<Vec<Event>, ValidationError> {
        let idx = self.task_index(task_id)?;
        let current = self.subtasks_for(task_id);
        if !current.iter().any(|s| s.id == subtask_id) {
            return Err(not_found("subtask", subtask_id));
        }
        let (rest, delta) = task::remove_subtask(&mut self.tasks[idx], &current, subtask_id);
        self.replace_subtasks(task_id, rest);

        let mut events = Vec::new();
        self.award(
            delta,
            XpSource::Subtask {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            },
            clock.local_now(),
            &mut events,
        );
        Ok(events)
    }

    fn replace_subtasks(&mut self, task_id: &str, subtasks: Vec<Subtask>) {
        self.subtasks.retain(|s| s.task_id != task_id);
        self.subtasks.extend(subtasks);
    }

    pub fn toggle_subtask(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        clock: &dyn Clock,
    ) -> Result<Vec<Event>, ValidationError> {
        let ti = self.task_index(task_id)?;
        let si = self
            .subtasks
            .iter()
            .position(|s| s.id == subtask_id && s.task_id == task_id)
            .ok_or_else(|| not_found("subtask", subtask_id))?;

        let now = clock.local_now();
        let delta = task::toggle_subtask(&mut self.tasks[ti], &mut self.subtasks[si], now);
        let mut events = Vec::new();
        self.award(
            delta,
            XpSource::Subtask {
                task_id: task_id.to_string(),
                subtask_id: subtask_id.to_string(),
            },
            now,
            &mut events,
        );
        Ok(events)
    }

    /// Complete a task, pay what it still owes plus any early bonus, and
    /// evaluate the task achievements.
    pub fn complete_task(
        &mut self,
        task_id: &str,
        clock: &dyn Clock,
    ) -> Result<Vec<Event>, ValidationError> {
        let idx = self.task_index(task_id)?;
        let now = clock.local_now();
        let mut events = Vec::new();
        if self.tasks[idx].status == TaskStatus::Completed {
            return Ok(events);
        }

        let xp = task::complete_task(&mut self.tasks[idx], now);
        info!(task = task_id, xp, "task completed");
        events.push(Event::TaskCompleted {
            task_id: task_id.to_string(),
            xp,
            at: now,
        });
        self.award(
            xp as i64,
            XpSource::Task {
                task_id: task_id.to_string(),
            },
            now,
            &mut events,
        );
        if self.active_task_id.as_deref() == Some(task_id) {
            self.active_task_id = None;
        }

        let ids = check_task_achievements(&TaskAchievementContext {
            tasks: &self.tasks,
            unlocked_ids: &self.unlocked,
        });
        for id in ids {
            self.unlock(id, now, &mut events);
        }
        Ok(events)
    }

    /// Choose the task that focus cycles are linked to. Completed tasks
    /// cannot be activated.
    pub fn set_active_task(&mut self, task_id: Option<&str>) -> Result<(), ValidationError> {
        match task_id {
            None => self.active_task_id = None,
            Some(id) => {
                let idx = self.task_index(id)?;
                if self.tasks[idx].status == TaskStatus::Completed {
                    return Err(ValidationError::invalid(
                        "task",
                        format!("{id} is already completed"),
                    ));
                }
                self.active_task_id = Some(id.to_string());
            }
        }
        Ok(())
    }

    pub fn reorder_tasks(&mut self, ids: &[String]) -> Result<(), ValidationError> {
        if let Some(unknown) = ids.iter().find(|id| self.task(id).is_none()) {
            return Err(not_found("task", unknown));
        }
        task::reorder(&mut self.tasks, ids);
        Ok(())
    }

    /// Penalize every task whose deadline has passed, once each, and flag
    /// them overdue. Meant to run on a fixed interval.
    pub fn apply_overdue_penalties(&mut self, clock: &dyn Clock) -> Vec<Event> {
        let now = clock.local_now();
        let due: Vec<String> = get_tasks_for_penalty(&self.tasks, now.date())
            .into_iter()
            .map(|t| t.id.clone())
            .collect();

        let mut events = Vec::new();
        for task_id in due {
            let Some(overdue) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
                continue;
            };
            let penalty = task::apply_penalty(overdue);
            if penalty == 0 {
                continue;
            }
            info!(task = %task_id, penalty, "overdue penalty applied");
            events.push(Event::TaskPenalized {
                task_id: task_id.clone(),
                penalty,
                at: now,
            });
            self.award(-(penalty as i64), XpSource::Penalty { task_id }, now, &mut events);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::modes::{default_preset, preset_by_id};
    use crate::task::EffortTier;
    use crate::timer::{TimerEngine, TimerPhase};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::AchievementUnlocked { id, .. } | Event::QuestCompleted { id, .. } => {
                    Some(id.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_focus_pipeline() {
        // Wednesday, before 09:00
        let clock = ManualClock::at(date(2024, 3, 6), 8, 0);
        let mut ledger = Ledger::new();
        let events = ledger.record_focus_completion(&default_preset(), &clock);

        assert_eq!(ledger.daily_stats.len(), 1);
        assert_eq!(ledger.progress.current_streak, 1);
        assert_eq!(ledger.progress.last_activity_date, Some(date(2024, 3, 6)));
        assert_eq!(ids(&events), vec!["first_focus", "daily_early_bird"]);
        // 10 focus + 10 achievement + 25 quest
        assert_eq!(ledger.progress.total_xp, 45);
        assert!(ledger.modes_used.contains("traditional"));
    }

    #[test]
    fn achievements_unlock_once() {
        let clock = ManualClock::at(date(2024, 3, 6), 10, 0);
        let mut ledger = Ledger::new();
        ledger.record_focus_completion(&default_preset(), &clock);
        clock.advance_secs(1800);
        let events = ledger.record_focus_completion(&default_preset(), &clock);
        assert!(!ids(&events).contains(&"first_focus".to_string()));
        assert_eq!(ledger.unlocked.len(), 1);
    }

    #[test]
    fn focus_xp_uses_prior_streak() {
        let clock = ManualClock::at(date(2024, 3, 4), 10, 0);
        let mut ledger = Ledger::new();
        for day in 0..3 {
            ledger.daily_stats.push(DailyStat {
                date: date(2024, 3, 1) + chrono::Duration::days(day),
                mode_id: "traditional".into(),
                cycles_completed: 1,
                focus_minutes: 25,
            });
        }
        let events = ledger.record_focus_completion(&default_preset(), &clock);
        let focus_xp = events.iter().find_map(|e| match e {
            Event::XpAwarded {
                amount,
                source: XpSource::Focus { streak, .. },
                ..
            } => Some((*amount, *streak)),
            _ => None,
        });
        assert_eq!(focus_xp, Some((11, 3)));
        assert_eq!(ledger.progress.current_streak, 4);
        assert_eq!(ledger.progress.best_streak, 4);
    }

    #[test]
    fn quests_reward_once_per_period() {
        let clock = ManualClock::at(date(2024, 3, 6), 14, 0);
        let mut ledger = Ledger::new();
        let sustainable = preset_by_id("sustainable").unwrap();
        let first = ledger.record_focus_completion(&sustainable, &clock);
        assert!(!ids(&first).contains(&"daily_100_minutes".to_string()));
        let second = ledger.record_focus_completion(&sustainable, &clock);
        assert!(ids(&second).contains(&"daily_100_minutes".to_string()));
        let third = ledger.record_focus_completion(&sustainable, &clock);
        assert!(!ids(&third).contains(&"daily_100_minutes".to_string()));
        assert!(ids(&third).contains(&"daily_3_focuses".to_string()));

        clock.advance_days(1);
        ledger.refresh_quests(clock.today());
        assert!(ledger.daily_quests.iter().all(|q| !q.completed));
        assert_eq!(ledger.weekly_quests[0].current_progress, 3);
    }

    #[test]
    fn active_task_collects_cycles() {
        let clock = ManualClock::at(date(2024, 3, 6), 10, 0);
        let mut ledger = Ledger::new();
        let task = ledger
            .add_task(CreateTaskInput::new("Draft", EffortTier::Common), &[], &clock)
            .unwrap();
        ledger.set_active_task(Some(&task.id)).unwrap();
        let events = ledger.record_focus_completion(&default_preset(), &clock);
        assert!(events.iter().any(|e| matches!(e, Event::CycleLinked { linked_cycles: 1, .. })));
        assert_eq!(ledger.task(&task.id).unwrap().linked_cycles, 1);
    }

    #[test]
    fn handle_tick_ignores_breaks_and_plain_ticks() {
        let clock = ManualClock::at(date(2024, 3, 6), 10, 0);
        let mode = Mode {
            focus_secs: 60,
            short_break_secs: 60,
            ..Mode::custom("fast")
        };
        let mut engine = TimerEngine::new(mode.clone());
        let mut ledger = Ledger::new();

        engine.start(&clock);
        clock.advance_secs(30);
        let tick = engine.tick(&clock);
        assert!(ledger.handle_tick(&tick, &mode, &clock).is_empty());

        clock.advance_secs(30);
        let tick = engine.tick(&clock);
        let events = ledger.handle_tick(&tick, &mode, &clock);
        assert!(matches!(events[0], Event::PhaseCompleted { phase: TimerPhase::Focus, .. }));
        assert!(ledger.has_custom_mode);

        engine.start(&clock);
        clock.advance_secs(60);
        let tick = engine.tick(&clock);
        let events = ledger.handle_tick(&tick, &mode, &clock);
        assert_eq!(events.len(), 1);
        assert_eq!(ledger.daily_stats[0].cycles_completed, 1);
    }

    #[test]
    fn task_completion_with_subtasks() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        let input =
            CreateTaskInput::new("Essay", EffortTier::Common).with_deadline(date(2024, 3, 10));
        let titles = vec!["outline".to_string(), "draft".to_string(), "edit".to_string()];
        let task = ledger.add_task(input, &titles, &clock).unwrap();
        let subtasks = ledger.subtasks_for(&task.id);
        assert_eq!(subtasks.len(), 3);

        ledger.toggle_subtask(&task.id, &subtasks[0].id, &clock).unwrap();
        assert_eq!(ledger.progress.total_xp, 5);

        let events = ledger.complete_task(&task.id, &clock).unwrap();
        // remaining 10 + 50% early bonus 7, then first_task 10
        assert!(events.iter().any(|e| matches!(e, Event::TaskCompleted { xp: 17, .. })));
        assert_eq!(ids(&events), vec!["first_task"]);
        assert_eq!(ledger.progress.total_xp, 5 + 17 + 10);

        assert!(ledger.complete_task(&task.id, &clock).unwrap().is_empty());
        assert!(ledger.toggle_subtask(&task.id, &subtasks[1].id, &clock).unwrap().is_empty());
    }

    #[test]
    fn remove_completed_subtask_debits_user() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        let titles = vec!["a".to_string(), "b".to_string()];
        let task = ledger
            .add_task(CreateTaskInput::new("t", EffortTier::Legendary), &titles, &clock)
            .unwrap();
        let first = ledger.subtasks_for(&task.id)[0].id.clone();
        ledger.toggle_subtask(&task.id, &first, &clock).unwrap();
        assert_eq!(ledger.progress.total_xp, 25);

        ledger.remove_subtask(&task.id, &first, &clock).unwrap();
        assert_eq!(ledger.progress.total_xp, 0);
        assert_eq!(ledger.subtasks_for(&task.id)[0].xp_reward, 50);

        let added = ledger.add_subtask(&task.id, "c").unwrap();
        assert!(added.iter().all(|s| s.xp_reward == 25));
    }

    #[test]
    fn overdue_penalty_applies_once() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        ledger.progress.total_xp = 100;
        let input = CreateTaskInput::new("late", EffortTier::Epic).with_deadline(date(2024, 3, 2));
        let task = ledger.add_task(input, &[], &clock).unwrap();

        assert!(ledger.apply_overdue_penalties(&clock).is_empty());
        clock.advance_days(2);
        let events = ledger.apply_overdue_penalties(&clock);
        assert!(matches!(events[0], Event::TaskPenalized { penalty: 16, .. }));
        assert_eq!(ledger.progress.total_xp, 84);
        assert_eq!(ledger.task(&task.id).unwrap().status, TaskStatus::Overdue);
        assert!(ledger.apply_overdue_penalties(&clock).is_empty());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        assert_eq!(
            ledger.complete_task("nope", &clock),
            Err(ValidationError::NotFound { kind: "task", id: "nope".into() })
        );
        assert!(ledger.set_active_task(Some("nope")).is_err());
        assert!(ledger.reorder_tasks(&["nope".to_string()]).is_err());
        assert!(ledger
            .add_task(CreateTaskInput::new("  ", EffortTier::Common), &[], &clock)
            .is_err());
    }

    #[test]
    fn export_unlock_and_reset() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        let events = ledger.mark_exported(&clock);
        assert_eq!(ids(&events), vec!["export_data"]);
        assert!(ledger.exported);
        assert!(ledger.mark_exported(&clock).is_empty());
        assert!(ledger.unlock_manual("not_a_thing", &clock).is_empty());

        ledger.reset();
        assert_eq!(ledger, Ledger::default());
    }

    #[test]
    fn custom_mode_registration_unlocks() {
        let clock = ManualClock::at(date(2024, 3, 1), 10, 0);
        let mut ledger = Ledger::new();
        let events = ledger.register_custom_mode(&clock);
        assert_eq!(ids(&events), vec!["custom_mode"]);
    }
}
