//! Achievement catalog and unlock rules.
//!
//! The catalog is static. Unlock state lives with the caller as a set of
//! ids; the rules only decide which ids newly qualify for a given snapshot.
//! Each rule reads the snapshot alone, so evaluation order never matters.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use super::stats::{aggregate_by_mode, cycles_by_date, DailyStat};
use super::streak::calculate_streaks;
use crate::dates::{is_weekend, week_days};
use crate::modes::PRESET_IDS;
use crate::task::{EffortTier, Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Beginner,
    Consistency,
    Quantity,
    Modes,
    Special,
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub xp: u64,
    /// Title the user may display once unlocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocks_title: Option<&'static str>,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    xp: u64,
) -> Achievement {
    Achievement {
        id,
        name,
        description,
        category,
        xp,
        unlocks_title: None,
    }
}

const fn titled(achievement: Achievement, title: &'static str) -> Achievement {
    Achievement {
        unlocks_title: Some(title),
        ..achievement
    }
}

use AchievementCategory::*;

pub const ACHIEVEMENTS: &[Achievement] = &[
    entry("first_focus", "Initiation", "Complete your first focus session", Beginner, 10),
    entry("five_focuses", "Daily Devotion", "Complete 5 focus sessions in one day", Beginner, 25),
    entry("ten_focuses", "Marathon", "Complete 10 focus sessions in one day", Beginner, 60),
    entry("streak_3", "Flame Keeper", "Keep a 3-day streak", Consistency, 30),
    entry("streak_7", "Light Protector", "Keep a 7-day streak", Consistency, 50),
    entry("streak_14", "Steadfast", "Keep a 14-day streak", Consistency, 100),
    titled(
        entry("streak_30", "Eternal Flame", "Keep a 30-day streak", Consistency, 200),
        "Flame Guardian",
    ),
    titled(
        entry("streak_60", "Unbroken", "Keep a 60-day streak", Consistency, 400),
        "Unbroken",
    ),
    entry("total_25", "Warrior in Training", "Complete 25 focus sessions", Quantity, 50),
    entry("total_100", "Veteran", "Complete 100 focus sessions", Quantity, 100),
    entry("total_250", "Champion", "Complete 250 focus sessions", Quantity, 150),
    titled(
        entry("total_500", "Living Legend", "Complete 500 focus sessions", Quantity, 250),
        "Living Legend",
    ),
    titled(
        entry("total_1000", "Mythic", "Complete 1000 focus sessions", Quantity, 500),
        "Mythic",
    ),
    titled(
        entry("try_all_modes", "Versatile Master", "Use every preset mode", Modes, 30),
        "Versatile",
    ),
    entry("custom_mode", "Pathmaker", "Create a custom mode", Modes, 20),
    entry("mode_master", "Specialist", "Complete 50 sessions in a single mode", Modes, 75),
    titled(
        entry("early_bird", "Dawn Herald", "Finish a session before 07:00", Special, 40),
        "Dawn Herald",
    ),
    titled(
        entry("night_owl", "Night Sentinel", "Finish a session at or after 23:00", Special, 40),
        "Night Sentinel",
    ),
    titled(
        entry(
            "weekend_warrior",
            "Tireless",
            "Complete 3 sessions on a Saturday or Sunday",
            Special,
            35,
        ),
        "Tireless",
    ),
    titled(
        entry(
            "perfect_week",
            "Perfect Week",
            "Complete 2 sessions on every day of a week",
            Special,
            100,
        ),
        "Master of Discipline",
    ),
    entry("export_data", "Chronicler", "Export your data", Special, 15),
    entry("first_task", "First Scroll", "Complete your first task", Tasks, 10),
    titled(
        entry(
            "task_streak_5",
            "Punctual",
            "Complete 5 tasks on or before their deadline",
            Tasks,
            30,
        ),
        "Scribe",
    ),
    entry("task_early", "Ahead of Time", "Complete 3 tasks at least a day early", Tasks, 40),
    titled(
        entry("task_epic", "Epic Hunter", "Complete 10 epic or legendary tasks", Tasks, 50),
        "Epic Hunter",
    ),
    entry("task_linked", "Devoted", "Spend 10 focus sessions on a single task", Tasks, 25),
];

pub fn achievement_by_id(id: &str) -> Option<&'static Achievement> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}

/// Snapshot evaluated by the focus-driven rules.
#[derive(Debug, Clone, Copy)]
pub struct AchievementContext<'a> {
    pub daily_stats: &'a [DailyStat],
    pub unlocked_ids: &'a BTreeSet<String>,
    pub total_focus_cycles: u64,
    pub modes_used: &'a BTreeSet<String>,
    pub has_custom_mode: bool,
    /// Local time of the completion that triggered the check, if any.
    pub completion_time: Option<NaiveDateTime>,
    pub today: NaiveDate,
}

impl AchievementContext<'_> {
    fn cycles_on(&self, date: NaiveDate) -> u32 {
        self.daily_stats
            .iter()
            .filter(|s| s.date == date)
            .map(|s| s.cycles_completed)
            .sum()
    }

    fn current_streak(&self) -> u32 {
        let dates: Vec<NaiveDate> = self
            .daily_stats
            .iter()
            .filter(|s| s.cycles_completed > 0)
            .map(|s| s.date)
            .collect();
        calculate_streaks(&dates, self.today).current
    }

    fn completion_hour(&self) -> Option<u32> {
        self.completion_time.map(|t| t.hour())
    }
}

/// Snapshot evaluated by the task-driven rules.
#[derive(Debug, Clone, Copy)]
pub struct TaskAchievementContext<'a> {
    pub tasks: &'a [Task],
    pub unlocked_ids: &'a BTreeSet<String>,
}

impl<'a> TaskAchievementContext<'a> {
    fn completed(&self) -> impl Iterator<Item = &'a Task> {
        let tasks: &'a [Task] = self.tasks;
        tasks.iter().filter(|t| t.status == TaskStatus::Completed)
    }

    /// Completed tasks with both a deadline and a completion time, as
    /// (deadline, completion date).
    fn dated_completions(&self) -> impl Iterator<Item = (NaiveDate, NaiveDate)> + 'a {
        self.completed()
            .filter_map(|t| Some((t.deadline?, t.completed_at?.date())))
    }
}

pub struct AchievementRule {
    pub id: &'static str,
    pub check: fn(&AchievementContext<'_>) -> bool,
}

pub struct TaskAchievementRule {
    pub id: &'static str,
    pub check: fn(&TaskAchievementContext<'_>) -> bool,
}

const fn rule(id: &'static str, check: fn(&AchievementContext<'_>) -> bool) -> AchievementRule {
    AchievementRule { id, check }
}

const fn task_rule(
    id: &'static str,
    check: fn(&TaskAchievementContext<'_>) -> bool,
) -> TaskAchievementRule {
    TaskAchievementRule { id, check }
}

pub const FOCUS_RULES: &[AchievementRule] = &[
    rule("first_focus", |c| c.total_focus_cycles >= 1),
    rule("five_focuses", |c| c.cycles_on(c.today) >= 5),
    rule("ten_focuses", |c| c.cycles_on(c.today) >= 10),
    rule("streak_3", |c| c.current_streak() >= 3),
    rule("streak_7", |c| c.current_streak() >= 7),
    rule("streak_14", |c| c.current_streak() >= 14),
    rule("streak_30", |c| c.current_streak() >= 30),
    rule("streak_60", |c| c.current_streak() >= 60),
    rule("total_25", |c| c.total_focus_cycles >= 25),
    rule("total_100", |c| c.total_focus_cycles >= 100),
    rule("total_250", |c| c.total_focus_cycles >= 250),
    rule("total_500", |c| c.total_focus_cycles >= 500),
    rule("total_1000", |c| c.total_focus_cycles >= 1000),
    rule("try_all_modes", |c| {
        PRESET_IDS.iter().all(|id| c.modes_used.contains(*id))
    }),
    rule("custom_mode", |c| c.has_custom_mode),
    rule("mode_master", |c| {
        aggregate_by_mode(c.daily_stats).values().any(|t| t.cycles >= 50)
    }),
    rule("early_bird", |c| c.completion_hour().is_some_and(|h| h < 7)),
    rule("night_owl", |c| c.completion_hour().is_some_and(|h| h >= 23)),
    rule("weekend_warrior", |c| {
        cycles_by_date(c.daily_stats)
            .into_iter()
            .any(|(date, cycles)| is_weekend(date) && cycles >= 3)
    }),
    // Only reachable when checked on the Sunday that closes the week.
    rule("perfect_week", |c| {
        c.today.weekday() == Weekday::Sun && week_days(c.today).all(|day| c.cycles_on(day) >= 2)
    }),
];

pub const TASK_RULES: &[TaskAchievementRule] = &[
    task_rule("first_task", |c| c.completed().next().is_some()),
    task_rule("task_streak_5", |c| {
        c.dated_completions()
            .filter(|(deadline, done)| done <= deadline)
            .count()
            >= 5
    }),
    task_rule("task_early", |c| {
        c.dated_completions()
            .filter(|(deadline, done)| done < deadline)
            .count()
            >= 3
    }),
    task_rule("task_epic", |c| {
        c.completed()
            .filter(|t| matches!(t.effort, EffortTier::Epic | EffortTier::Legendary))
            .count()
            >= 10
    }),
    task_rule("task_linked", |c| c.completed().any(|t| t.linked_cycles >= 10)),
];

/// Ids of focus achievements that qualify and are not yet unlocked.
pub fn check_achievements(ctx: &AchievementContext<'_>) -> Vec<&'static str> {
    FOCUS_RULES
        .iter()
        .filter(|rule| !ctx.unlocked_ids.contains(rule.id) && (rule.check)(ctx))
        .map(|rule| rule.id)
        .collect()
}

/// Ids of task achievements that qualify and are not yet unlocked.
pub fn check_task_achievements(ctx: &TaskAchievementContext<'_>) -> Vec<&'static str> {
    TASK_RULES
        .iter()
        .filter(|rule| !ctx.unlocked_ids.contains(rule.id) && (rule.check)(ctx))
        .map(|rule| rule.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::task::{complete_task, create_task, CreateTaskInput};
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stat(d: NaiveDate, mode: &str, cycles: u32) -> DailyStat {
        DailyStat {
            date: d,
            mode_id: mode.into(),
            cycles_completed: cycles,
            focus_minutes: cycles as u64 * 25,
        }
    }

    struct Fixture {
        stats: Vec<DailyStat>,
        unlocked: BTreeSet<String>,
        modes: BTreeSet<String>,
        total: u64,
        custom: bool,
        time: Option<NaiveDateTime>,
        today: NaiveDate,
    }

    impl Fixture {
        fn new(today: NaiveDate) -> Self {
            Self {
                stats: Vec::new(),
                unlocked: BTreeSet::new(),
                modes: BTreeSet::new(),
                total: 0,
                custom: false,
                time: None,
                today,
            }
        }

        fn check(&self) -> Vec<&'static str> {
            check_achievements(&AchievementContext {
                daily_stats: &self.stats,
                unlocked_ids: &self.unlocked,
                total_focus_cycles: self.total,
                modes_used: &self.modes,
                has_custom_mode: self.custom,
                completion_time: self.time,
                today: self.today,
            })
        }
    }

    #[test]
    fn catalog_ids_are_unique_and_complete() {
        let ids: BTreeSet<&str> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
        assert_eq!(ACHIEVEMENTS.len(), 26);
        let rule_ids = FOCUS_RULES.iter().map(|r| r.id).chain(TASK_RULES.iter().map(|r| r.id));
        for id in rule_ids {
            assert!(achievement_by_id(id).is_some(), "{id} missing from catalog");
        }
        assert_eq!(achievement_by_id("export_data").unwrap().xp, 15);
    }

    #[test]
    fn first_completion() {
        let today = date(2024, 3, 6);
        let mut f = Fixture::new(today);
        f.stats.push(stat(today, "traditional", 1));
        f.total = 1;
        f.modes.insert("traditional".into());
        f.time = Some(today.and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(f.check(), vec!["first_focus"]);
    }

    #[test]
    fn already_unlocked_never_returned() {
        let today = date(2024, 3, 6);
        let mut f = Fixture::new(today);
        f.stats.push(stat(today, "traditional", 6));
        f.total = 6;
        let first = f.check();
        assert!(first.contains(&"first_focus"));
        assert!(first.contains(&"five_focuses"));
        f.unlocked.extend(first.iter().map(|s| s.to_string()));
        assert!(f.check().is_empty());
    }

    #[test]
    fn daily_counts_sum_across_modes() {
        let today = date(2024, 3, 6);
        let mut f = Fixture::new(today);
        f.stats.push(stat(today, "traditional", 3));
        f.stats.push(stat(today, "animedoro", 2));
        f.stats.push(stat(today - Duration::days(1), "traditional", 9));
        f.total = 14;
        let unlocked = f.check();
        assert!(unlocked.contains(&"five_focuses"));
        assert!(!unlocked.contains(&"ten_focuses"));
    }

    #[test]
    fn streak_thresholds_from_history() {
        let today = date(2024, 3, 20);
        let mut f = Fixture::new(today);
        // 14 consecutive days ending yesterday
        for back in 1..=14 {
            f.stats.push(stat(today - Duration::days(back), "traditional", 1));
        }
        f.total = 14;
        let unlocked = f.check();
        for id in ["streak_3", "streak_7", "streak_14"] {
            assert!(unlocked.contains(&id), "{id}");
        }
        assert!(!unlocked.contains(&"streak_30"));
    }

    #[test]
    fn quantity_thresholds() {
        let mut f = Fixture::new(date(2024, 3, 6));
        f.total = 250;
        let unlocked = f.check();
        assert!(unlocked.contains(&"total_250"));
        assert!(!unlocked.contains(&"total_500"));
    }

    #[test]
    fn mode_rules() {
        let today = date(2024, 3, 6);
        let mut f = Fixture::new(today);
        f.modes.extend(PRESET_IDS.iter().map(|s| s.to_string()));
        f.custom = true;
        f.stats.push(stat(date(2024, 1, 1), "animedoro", 30));
        f.stats.push(stat(date(2024, 1, 2), "animedoro", 20));
        let unlocked = f.check();
        assert!(unlocked.contains(&"try_all_modes"));
        assert!(unlocked.contains(&"custom_mode"));
        assert!(unlocked.contains(&"mode_master"));

        f.modes.remove("mangadoro");
        assert!(!f.check().contains(&"try_all_modes"));
    }

    #[test]
    fn hour_boundaries() {
        let today = date(2024, 3, 6);
        let mut f = Fixture::new(today);
        f.time = Some(today.and_hms_opt(6, 59, 0).unwrap());
        assert!(f.check().contains(&"early_bird"));
        f.time = Some(today.and_hms_opt(7, 0, 0).unwrap());
        assert!(!f.check().contains(&"early_bird"));
        f.time = Some(today.and_hms_opt(23, 0, 0).unwrap());
        assert!(f.check().contains(&"night_owl"));
        f.time = Some(today.and_hms_opt(22, 59, 59).unwrap());
        assert!(!f.check().contains(&"night_owl"));
        f.time = None;
        let unlocked = f.check();
        assert!(!unlocked.contains(&"early_bird") && !unlocked.contains(&"night_owl"));
    }

    #[test]
    fn weekend_warrior_on_any_weekend_day() {
        let mut f = Fixture::new(date(2024, 3, 13));
        // Saturday 2024-03-09 split across two modes
        f.stats.push(stat(date(2024, 3, 9), "traditional", 2));
        f.stats.push(stat(date(2024, 3, 9), "animedoro", 1));
        assert!(f.check().contains(&"weekend_warrior"));

        let mut weekday = Fixture::new(date(2024, 3, 13));
        weekday.stats.push(stat(date(2024, 3, 8), "traditional", 5));
        assert!(!weekday.check().contains(&"weekend_warrior"));
    }

    #[test]
    fn perfect_week_only_on_sunday() {
        let sunday = date(2024, 3, 10);
        let mut f = Fixture::new(sunday);
        for day in week_days(sunday) {
            f.stats.push(stat(day, "traditional", 2));
        }
        assert!(f.check().contains(&"perfect_week"));

        f.today = date(2024, 3, 9);
        assert!(!f.check().contains(&"perfect_week"));

        f.today = sunday;
        f.stats[3].cycles_completed = 1;
        assert!(!f.check().contains(&"perfect_week"));
    }

    fn completed_task(
        effort: EffortTier,
        deadline: Option<NaiveDate>,
        done: NaiveDate,
        clock: &ManualClock,
    ) -> Task {
        let mut input = CreateTaskInput::new("t", effort);
        input.deadline = deadline;
        let mut task = create_task(input, clock);
        complete_task(&mut task, done.and_hms_opt(12, 0, 0).unwrap());
        task
    }

    fn check_tasks(tasks: &[Task], unlocked: &BTreeSet<String>) -> Vec<&'static str> {
        check_task_achievements(&TaskAchievementContext {
            tasks,
            unlocked_ids: unlocked,
        })
    }

    #[test]
    fn task_rules_evaluate_completed_tasks() {
        let clock = ManualClock::at(date(2024, 3, 1), 9, 0);
        let deadline = date(2024, 3, 10);
        let mut tasks: Vec<Task> = (0..3)
            .map(|_| completed_task(EffortTier::Common, Some(deadline), date(2024, 3, 8), &clock))
            .collect();
        tasks.push(completed_task(EffortTier::Common, Some(deadline), deadline, &clock));
        tasks.push(completed_task(EffortTier::Common, Some(deadline), date(2024, 3, 11), &clock));

        let unlocked = BTreeSet::new();
        let ids = check_tasks(&tasks, &unlocked);
        assert_eq!(ids, vec!["first_task", "task_early"]);

        tasks.push(completed_task(EffortTier::Common, Some(deadline), deadline, &clock));
        let ids = check_tasks(&tasks, &unlocked);
        assert!(ids.contains(&"task_streak_5"));
    }

    #[test]
    fn epic_and_linked_task_rules() {
        let clock = ManualClock::at(date(2024, 3, 1), 9, 0);
        let mut tasks: Vec<Task> = (0..10)
            .map(|i| {
                let effort = if i % 2 == 0 { EffortTier::Epic } else { EffortTier::Legendary };
                completed_task(effort, None, date(2024, 3, 2), &clock)
            })
            .collect();
        let mut pending = create_task(CreateTaskInput::new("open", EffortTier::Common), &clock);
        pending.linked_cycles = 12;
        tasks.push(pending);

        let unlocked: BTreeSet<String> = ["first_task".to_string()].into();
        let ids = check_tasks(&tasks, &unlocked);
        assert_eq!(ids, vec!["task_epic"]);

        tasks[0].linked_cycles = 10;
        let ids = check_tasks(&tasks, &unlocked);
        assert!(ids.contains(&"task_linked"));
    }
}
