//! Daily rollover of per-day counters

use chrono::NaiveDate;

/// A record whose counters belong to a single calendar day
pub trait DailyCounter {
    fn last_reset_date(&self) -> NaiveDate;

    /// Zero the per-day counters and stamp `today`
    fn roll_over(&mut self, today: NaiveDate);
}

/// Compare a record's reset date against `today`, returning the reconciled
/// record and whether anything changed.
pub fn reconcile<T: DailyCounter + Clone>(state: &T, today: NaiveDate) -> (T, bool) {
    let mut next = state.clone();
    let changed = reconcile_in_place(&mut next, today);
    (next, changed)
}

/// In-place form of [`reconcile`]
pub fn reconcile_in_place<T: DailyCounter>(state: &mut T, today: NaiveDate) -> bool {
    if state.last_reset_date() == today {
        return false;
    }
    state.roll_over(today);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Durations, TimerState, WaterState};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn stale_counters_are_zeroed() {
        let mut timer = TimerState::fresh(Durations::default(), day(15));
        timer.cycles_completed_today = 6;
        timer.time_left_seconds = 420;

        let (next, changed) = reconcile(&timer, day(16));
        assert!(changed);
        assert_eq!(next.cycles_completed_today, 0);
        assert_eq!(next.last_reset_date, day(16));
        // only the counter belongs to the day
        assert_eq!(next.time_left_seconds, 420);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let water = WaterState {
            glasses_logged_today: 5,
            last_reset_date: day(14),
        };
        let (once, first) = reconcile(&water, day(16));
        let (twice, second) = reconcile(&once, day(16));
        assert!(first);
        assert!(!second);
        assert_eq!(once, twice);
    }

    #[test]
    fn counters_roll_over_independently() {
        let mut timer = TimerState::fresh(Durations::default(), day(16));
        timer.cycles_completed_today = 2;
        let mut water = WaterState {
            glasses_logged_today: 3,
            last_reset_date: day(15),
        };

        assert!(!reconcile_in_place(&mut timer, day(16)));
        assert!(reconcile_in_place(&mut water, day(16)));
        assert_eq!(timer.cycles_completed_today, 2);
        assert_eq!(water.glasses_logged_today, 0);
        assert_eq!(water.last_reset_date, day(16));
    }
}
