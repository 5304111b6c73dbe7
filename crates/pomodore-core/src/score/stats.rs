//! Daily focus aggregates and period roll-ups.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::week_start;

/// One (date, mode) aggregate. Accumulate-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub mode_id: String,
    pub cycles_completed: u32,
    pub focus_minutes: u64,
}

impl DailyStat {
    pub fn new(date: NaiveDate, mode_id: impl Into<String>) -> Self {
        Self {
            date,
            mode_id: mode_id.into(),
            cycles_completed: 0,
            focus_minutes: 0,
        }
    }
}

/// Add one completed cycle to the matching (date, mode) row, creating it if needed.
pub fn record_cycle(stats: &mut Vec<DailyStat>, date: NaiveDate, mode_id: &str, minutes: u64) {
    let row = match stats
        .iter_mut()
        .position(|s| s.date == date && s.mode_id == mode_id)
    {
        Some(idx) => &mut stats[idx],
        None => {
            stats.push(DailyStat::new(date, mode_id));
            let last = stats.len() - 1;
            &mut stats[last]
        }
    };
    row.cycles_completed += 1;
    row.focus_minutes += minutes;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Today,
    /// Monday through Sunday of the week containing today.
    Week,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTotals {
    pub cycles: u64,
    pub minutes: u64,
}

impl StatTotals {
    fn add(&mut self, stat: &DailyStat) {
        self.cycles += stat.cycles_completed as u64;
        self.minutes += stat.focus_minutes;
    }
}

pub fn aggregate_stats(stats: &[DailyStat], period: StatsPeriod, today: NaiveDate) -> StatTotals {
    let monday = week_start(today);
    let in_period = |date: NaiveDate| match period {
        StatsPeriod::Today => date == today,
        StatsPeriod::Week => {
            let offset = date.signed_duration_since(monday).num_days();
            (0..7).contains(&offset)
        }
        StatsPeriod::All => true,
    };

    let mut totals = StatTotals::default();
    for stat in stats.iter().filter(|s| in_period(s.date)) {
        totals.add(stat);
    }
    totals
}

pub fn aggregate_by_mode(stats: &[DailyStat]) -> BTreeMap<String, StatTotals> {
    let mut by_mode: BTreeMap<String, StatTotals> = BTreeMap::new();
    for stat in stats {
        by_mode.entry(stat.mode_id.clone()).or_default().add(stat);
    }
    by_mode
}

/// Cycles per calendar date, summed across modes.
pub fn cycles_by_date(stats: &[DailyStat]) -> BTreeMap<NaiveDate, u32> {
    let mut by_date = BTreeMap::new();
    for stat in stats {
        *by_date.entry(stat.date).or_insert(0) += stat.cycles_completed;
    }
    by_date
}

/// Dates with at least one completed cycle, ascending and deduplicated.
pub fn active_dates(stats: &[DailyStat]) -> Vec<NaiveDate> {
    cycles_by_date(stats)
        .into_iter()
        .filter(|(_, cycles)| *cycles > 0)
        .map(|(date, _)| date)
        .collect()
}
