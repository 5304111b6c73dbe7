//! Score engine: XP, levels, streaks, daily aggregates and achievements.
//!
//! Everything here is a pure function over caller-supplied snapshots. The
//! caller owns the persisted state ([`UserProgress`], the [`DailyStat`] rows
//! and the set of unlocked achievement ids) and applies the results.

mod achievements;
mod stats;
mod streak;
mod xp;

pub use achievements::{
    achievement_by_id, check_achievements, check_task_achievements, Achievement,
    AchievementCategory, AchievementContext, AchievementRule, TaskAchievementContext,
    TaskAchievementRule, ACHIEVEMENTS, FOCUS_RULES, TASK_RULES,
};
pub use stats::{
    active_dates, aggregate_by_mode, aggregate_stats, cycles_by_date, record_cycle, DailyStat,
    StatTotals, StatsPeriod,
};
pub use streak::{calculate_streaks, Streaks};
pub use xp::{
    calculate_xp_for_focus, level_for_xp, streak_multiplier, xp_to_next_level, UserProgress,
    XP_PER_LEVEL,
};
