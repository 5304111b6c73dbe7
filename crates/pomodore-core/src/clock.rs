//! Time source abstraction.
//!
//! Engines never read ambient time. Every entry point that needs "now" takes a
//! [`Clock`], so production code passes [`SystemClock`] and tests pass a
//! [`ManualClock`] they can move forward at will.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Utc};

/// Supplies wall-clock reads to the engines.
pub trait Clock {
    /// Milliseconds since the Unix epoch. Used for timer drift correction.
    fn now_ms(&self) -> i64;

    /// Local calendar date and time. Used for every calendar decision.
    fn local_now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }

    fn local_now(&self) -> NaiveDateTime {
        (**self).local_now()
    }
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Scripted clock for tests and replays.
///
/// Both readings derive from the same instant, so `now_ms` and `local_now`
/// always move together.
#[derive(Debug)]
pub struct ManualClock {
    origin: NaiveDateTime,
    offset_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(origin: NaiveDateTime) -> Self {
        Self {
            origin,
            offset_ms: AtomicI64::new(0),
        }
    }

    /// Clock at local midnight-plus-`hour`:`minute` of the given date.
    ///
    /// Panics on an out-of-range hour or minute; intended for test setup.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
        let origin = date
            .and_hms_opt(hour, minute, 0)
            .unwrap_or_else(|| panic!("invalid time {hour}:{minute}"));
        Self::new(origin)
    }

    pub fn advance_ms(&self, ms: i64) {
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs.saturating_mul(1000));
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_secs(days.saturating_mul(86_400));
    }

    /// Jump to an absolute local time.
    pub fn set(&self, at: NaiveDateTime) {
        let delta = at.signed_duration_since(self.origin).num_milliseconds();
        self.offset_ms.store(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.origin.and_utc().timestamp_millis() + self.offset_ms.load(Ordering::SeqCst)
    }

    fn local_now(&self) -> NaiveDateTime {
        self.origin + Duration::milliseconds(self.offset_ms.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn manual_clock_readings_move_together() {
        let clock = ManualClock::at(date(2024, 3, 4), 8, 0);
        let start_ms = clock.now_ms();
        clock.advance_secs(90);
        assert_eq!(clock.now_ms() - start_ms, 90_000);
        assert_eq!(clock.local_now().time().to_string(), "08:01:30");
    }

    #[test]
    fn advance_days_rolls_the_calendar() {
        let clock = ManualClock::at(date(2024, 3, 4), 23, 30);
        clock.advance_days(1);
        assert_eq!(clock.today(), date(2024, 3, 5));
    }

    #[test]
    fn set_jumps_to_absolute_time() {
        let clock = ManualClock::at(date(2024, 3, 4), 8, 0);
        clock.set(date(2024, 3, 10).and_hms_opt(6, 0, 0).unwrap());
        assert_eq!(clock.today(), date(2024, 3, 10));
        clock.set(date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(clock.today(), date(2024, 3, 1));
    }

    #[test]
    fn clock_works_through_references() {
        fn read(clock: &dyn Clock) -> NaiveDate {
            clock.today()
        }
        let clock = ManualClock::at(date(2024, 1, 1), 12, 0);
        assert_eq!(read(&&clock), date(2024, 1, 1));
    }
}
