//! Focus XP, streak multipliers, levels and the user's running totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::modes::Mode;

/// XP needed per level.
pub const XP_PER_LEVEL: u64 = 100;

/// Streak tiers as (minimum days, multiplier in percent). Highest first.
const STREAK_TIERS: [(u32, u64); 4] = [(30, 200), (14, 150), (7, 125), (3, 110)];

fn streak_multiplier_pct(streak_days: u32) -> u64 {
    STREAK_TIERS
        .iter()
        .find(|(min_days, _)| streak_days >= *min_days)
        .map(|(_, pct)| *pct)
        .unwrap_or(100)
}

/// Discrete multiplier for a streak length: x2.0 at 30 days, x1.5 at 14,
/// x1.25 at 7, x1.10 at 3, otherwise x1.0.
pub fn streak_multiplier(streak_days: u32) -> f64 {
    streak_multiplier_pct(streak_days) as f64 / 100.0
}

/// XP for one completed focus phase: one point per 2.5 focus minutes,
/// scaled by the streak multiplier, both steps rounded down.
pub fn calculate_xp_for_focus(mode: &Mode, current_streak: u32) -> u64 {
    // focus_minutes / 2.5 == focus_secs / 150
    let base = mode.focus_secs / 150;
    base * streak_multiplier_pct(current_streak) / 100
}

pub fn level_for_xp(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

pub fn xp_to_next_level(total_xp: u64) -> u64 {
    level_for_xp(total_xp) * XP_PER_LEVEL - total_xp
}

/// Running totals persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_xp: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    #[serde(default)]
    pub last_activity_date: Option<NaiveDate>,
}

impl UserProgress {
    /// Add or remove XP. The total never drops below zero.
    pub fn apply_xp(&mut self, delta: i64) {
        self.total_xp = if delta >= 0 {
            self.total_xp.saturating_add(delta as u64)
        } else {
            self.total_xp.saturating_sub(delta.unsigned_abs())
        };
    }

    pub fn level(&self) -> u64 {
        level_for_xp(self.total_xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{default_preset, preset_by_id};

    #[test]
    fn multiplier_tiers() {
        assert_eq!(streak_multiplier(0), 1.0);
        assert_eq!(streak_multiplier(2), 1.0);
        assert_eq!(streak_multiplier(3), 1.10);
        assert_eq!(streak_multiplier(7), 1.25);
        assert_eq!(streak_multiplier(13), 1.25);
        assert_eq!(streak_multiplier(14), 1.5);
        assert_eq!(streak_multiplier(30), 2.0);
        assert_eq!(streak_multiplier(365), 2.0);
    }

    #[test]
    fn focus_xp_examples() {
        let traditional = default_preset();
        assert_eq!(calculate_xp_for_focus(&traditional, 0), 10);
        assert_eq!(calculate_xp_for_focus(&traditional, 3), 11);
        assert_eq!(calculate_xp_for_focus(&traditional, 7), 12);
        assert_eq!(calculate_xp_for_focus(&traditional, 14), 15);
        assert_eq!(calculate_xp_for_focus(&traditional, 30), 20);

        let sustainable = preset_by_id("sustainable").unwrap();
        assert_eq!(calculate_xp_for_focus(&sustainable, 0), 20);
        assert_eq!(calculate_xp_for_focus(&sustainable, 3), 22);
    }

    #[test]
    fn short_focus_earns_nothing() {
        let mode = Mode {
            focus_secs: 120,
            ..Mode::custom("tiny")
        };
        assert_eq!(calculate_xp_for_focus(&mode, 30), 0);
    }

    #[test]
    fn levels() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(xp_to_next_level(0), 100);
        assert_eq!(xp_to_next_level(150), 50);
    }

    #[test]
    fn xp_floor_at_zero() {
        let mut progress = UserProgress::default();
        progress.apply_xp(10);
        progress.apply_xp(-25);
        assert_eq!(progress.total_xp, 0);
        progress.apply_xp(130);
        assert_eq!(progress.level(), 2);
    }
}
