//! Quest engine: recurring daily and weekly goals.
//!
//! Quests are generated from fixed templates for each period. Within a
//! period progress only grows and is clamped to the target; a new period
//! starts from fresh templates.

mod progress;

pub use progress::{
    apply_updates, calculate_total_quest_xp, is_early_bird_focus, quest_progress_for_focus,
    set_progress, update_quest_progress, QuestUpdate,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::week_start;

/// Period a quest belongs to. Weekly scopes are keyed by their Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "key")]
pub enum QuestScope {
    Daily(NaiveDate),
    Weekly(NaiveDate),
}

impl QuestScope {
    pub fn daily(today: NaiveDate) -> Self {
        QuestScope::Daily(today)
    }

    pub fn weekly(today: NaiveDate) -> Self {
        QuestScope::Weekly(week_start(today))
    }

    pub fn key(&self) -> NaiveDate {
        match self {
            QuestScope::Daily(date) | QuestScope::Weekly(date) => *date,
        }
    }

    fn templates(&self) -> &'static [QuestTemplate] {
        match self {
            QuestScope::Daily(_) => DAILY_QUEST_TEMPLATES,
            QuestScope::Weekly(_) => WEEKLY_QUEST_TEMPLATES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: u32,
    pub xp_reward: u64,
}

pub const DAILY_3_FOCUSES: &str = "daily_3_focuses";
pub const DAILY_100_MINUTES: &str = "daily_100_minutes";
pub const DAILY_EARLY_BIRD: &str = "daily_early_bird";
pub const WEEKLY_20_FOCUSES: &str = "weekly_20_focuses";
pub const WEEKLY_PERFECT_WEEK: &str = "weekly_perfect_week";

pub const DAILY_QUEST_TEMPLATES: &[QuestTemplate] = &[
    QuestTemplate {
        id: DAILY_3_FOCUSES,
        name: "Daily Ritual",
        description: "Complete 3 focus sessions today",
        target: 3,
        xp_reward: 30,
    },
    QuestTemplate {
        id: DAILY_100_MINUTES,
        name: "Marathoner",
        description: "Accumulate 100 focus minutes today",
        target: 100,
        xp_reward: 40,
    },
    QuestTemplate {
        id: DAILY_EARLY_BIRD,
        name: "Early Riser",
        description: "Complete a focus session before 09:00",
        target: 1,
        xp_reward: 25,
    },
];

pub const WEEKLY_QUEST_TEMPLATES: &[QuestTemplate] = &[
    QuestTemplate {
        id: WEEKLY_20_FOCUSES,
        name: "Warrior of the Week",
        description: "Complete 20 focus sessions this week",
        target: 20,
        xp_reward: 100,
    },
    QuestTemplate {
        id: WEEKLY_PERFECT_WEEK,
        name: "Perfect Week",
        description: "Complete at least one focus session on every day of the week",
        target: 7,
        xp_reward: 150,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target: u32,
    /// Always within `0..=target`.
    pub current_progress: u32,
    pub completed: bool,
    pub xp_reward: u64,
    pub scope: QuestScope,
}

impl Quest {
    fn from_template(template: &QuestTemplate, scope: QuestScope) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            target: template.target,
            current_progress: 0,
            completed: false,
            xp_reward: template.xp_reward,
            scope,
        }
    }
}

pub fn generate_quests(scope: QuestScope) -> Vec<Quest> {
    scope
        .templates()
        .iter()
        .map(|t| Quest::from_template(t, scope))
        .collect()
}

pub fn generate_daily_quests(date: NaiveDate) -> Vec<Quest> {
    generate_quests(QuestScope::daily(date))
}

pub fn generate_weekly_quests(today: NaiveDate) -> Vec<Quest> {
    generate_quests(QuestScope::weekly(today))
}

/// The quest set for `scope`: existing records for the same period are kept,
/// records from other periods are dropped and missing templates are filled
/// in fresh.
pub fn ensure_current(existing: &[Quest], scope: QuestScope) -> Vec<Quest> {
    scope
        .templates()
        .iter()
        .map(|template| {
            existing
                .iter()
                .find(|q| q.id == template.id && q.scope == scope)
                .cloned()
                .unwrap_or_else(|| Quest::from_template(template, scope))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn templates_match_catalog() {
        let daily = generate_daily_quests(date(2024, 3, 6));
        assert_eq!(daily.len(), 3);
        assert_eq!(
            daily.iter().map(|q| (q.id.as_str(), q.target, q.xp_reward)).collect::<Vec<_>>(),
            vec![(DAILY_3_FOCUSES, 3, 30), (DAILY_100_MINUTES, 100, 40), (DAILY_EARLY_BIRD, 1, 25)]
        );
        assert!(daily.iter().all(|q| q.current_progress == 0 && !q.completed));

        let weekly = generate_weekly_quests(date(2024, 3, 6));
        assert_eq!(weekly.len(), 2);
        assert!(weekly.iter().all(|q| q.scope == QuestScope::Weekly(date(2024, 3, 4))));
    }

    #[test]
    fn weekly_scope_keyed_by_monday() {
        assert_eq!(QuestScope::weekly(date(2024, 3, 10)).key(), date(2024, 3, 4));
        assert_eq!(QuestScope::weekly(date(2024, 3, 11)).key(), date(2024, 3, 11));
    }

    #[test]
    fn ensure_current_keeps_same_period() {
        let today = date(2024, 3, 6);
        let mut quests = generate_daily_quests(today);
        quests[0] = update_quest_progress(&quests[0], 2);

        let kept = ensure_current(&quests, QuestScope::daily(today));
        assert_eq!(kept, quests);
    }

    #[test]
    fn ensure_current_rolls_over() {
        let monday = date(2024, 3, 4);
        let mut weekly = generate_weekly_quests(monday);
        weekly[0] = update_quest_progress(&weekly[0], 20);
        assert!(weekly[0].completed);

        // Sunday still belongs to the same week
        let same = ensure_current(&weekly, QuestScope::weekly(date(2024, 3, 10)));
        assert!(same[0].completed);

        let next = ensure_current(&weekly, QuestScope::weekly(date(2024, 3, 11)));
        assert!(next.iter().all(|q| q.current_progress == 0 && !q.completed));
        assert!(next.iter().all(|q| q.scope.key() == date(2024, 3, 11)));
    }

    #[test]
    fn ensure_current_fills_missing_templates() {
        let today = date(2024, 3, 6);
        let partial = vec![generate_daily_quests(today).remove(1)];
        let filled = ensure_current(&partial, QuestScope::daily(today));
        assert_eq!(filled.len(), 3);
        assert_eq!(filled[1], partial[0]);
    }

    #[test]
    fn scope_serializes_with_key() {
        let json = serde_json::to_value(QuestScope::daily(date(2024, 3, 6))).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "daily", "key": "2024-03-06" }));
    }
}
