//! Quest progress updates driven by focus completions.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use super::{
    Quest, DAILY_100_MINUTES, DAILY_3_FOCUSES, DAILY_EARLY_BIRD, WEEKLY_20_FOCUSES,
    WEEKLY_PERFECT_WEEK,
};

/// Add `increment` to a quest's progress, clamped to the target.
///
/// Calling with 0 or after completion leaves the quest unchanged.
pub fn update_quest_progress(quest: &Quest, increment: u32) -> Quest {
    let progress = quest.current_progress.saturating_add(increment).min(quest.target);
    Quest {
        current_progress: progress,
        completed: progress >= quest.target,
        ..quest.clone()
    }
}

/// Set progress to an absolute value, clamped to the target. Progress
/// never moves backwards within a period.
pub fn set_progress(quest: &Quest, value: u32) -> Quest {
    let progress = value.max(quest.current_progress).min(quest.target);
    Quest {
        current_progress: progress,
        completed: progress >= quest.target,
        ..quest.clone()
    }
}

pub fn is_early_bird_focus(completion_time: NaiveDateTime) -> bool {
    completion_time.hour() < 9
}

/// Sum of XP over completed quests. For summaries only; rewards are
/// credited once, when a quest completes.
pub fn calculate_total_quest_xp(quests: &[Quest]) -> u64 {
    quests.iter().filter(|q| q.completed).map(|q| q.xp_reward).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum QuestUpdate {
    Increment { quest_id: &'static str, by: u32 },
    Absolute { quest_id: &'static str, value: u32 },
}

impl QuestUpdate {
    pub const fn increment(quest_id: &'static str, by: u32) -> Self {
        QuestUpdate::Increment { quest_id, by }
    }

    pub const fn absolute(quest_id: &'static str, value: u32) -> Self {
        QuestUpdate::Absolute { quest_id, value }
    }

    pub fn quest_id(&self) -> &'static str {
        match *self {
            QuestUpdate::Increment { quest_id, .. } | QuestUpdate::Absolute { quest_id, .. } => {
                quest_id
            }
        }
    }

    fn apply(&self, quest: &Quest) -> Quest {
        match *self {
            QuestUpdate::Increment { by, .. } => update_quest_progress(quest, by),
            QuestUpdate::Absolute { value, .. } => set_progress(quest, value),
        }
    }
}

/// What one completed focus phase contributes to the quest catalog.
///
/// `active_days_this_week` is the number of distinct days of the current
/// week with at least one completion, including this one.
pub fn quest_progress_for_focus(
    focus_minutes: u64,
    completion_time: NaiveDateTime,
    active_days_this_week: u32,
) -> Vec<QuestUpdate> {
    let minutes = u32::try_from(focus_minutes).unwrap_or(u32::MAX);
    let mut updates = vec![
        QuestUpdate::increment(DAILY_3_FOCUSES, 1),
        QuestUpdate::increment(DAILY_100_MINUTES, minutes),
    ];
    if is_early_bird_focus(completion_time) {
        updates.push(QuestUpdate::increment(DAILY_EARLY_BIRD, 1));
    }
    updates.push(QuestUpdate::increment(WEEKLY_20_FOCUSES, 1));
    updates.push(QuestUpdate::absolute(WEEKLY_PERFECT_WEEK, active_days_this_week));
    updates
}

/// Apply every update addressed to a quest in `quests`. Returns the quests
/// that went from incomplete to complete, so their reward can be paid once.
pub fn apply_updates(quests: &mut [Quest], updates: &[QuestUpdate]) -> Vec<Quest> {
    let mut newly_completed = Vec::new();
    for quest in quests.iter_mut() {
        let was_completed = quest.completed;
        let id = quest.id.clone();
        for update in updates.iter().filter(|u| u.quest_id() == id) {
            *quest = update.apply(quest);
        }
        if quest.completed && !was_completed {
            newly_completed.push(quest.clone());
        }
    }
    newly_completed
}
