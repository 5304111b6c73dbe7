//! Consecutive-day streaks computed from the full activity history.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    pub current: u32,
    pub best: u32,
}

/// Current and best streaks over a set of active dates.
///
/// The current streak counts back from today, or from yesterday when today
/// has no activity yet (one-day grace). Duplicate dates are ignored.
pub fn calculate_streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    if days.is_empty() {
        return Streaks::default();
    }

    let yesterday = today - Duration::days(1);
    let anchor = if days.contains(&today) {
        Some(today)
    } else if days.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };

    let mut current = 0;
    if let Some(mut day) = anchor {
        while days.contains(&day) {
            current += 1;
            day -= Duration::days(1);
        }
    }

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }

    Streaks { current, best }
}
