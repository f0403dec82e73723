//! Pomodoro timer state and its transitions
//!
//! The countdown never runs on its own clock. It only moves when the
//! coordinator feeds it elapsed wake-up periods through [`TimerState::tick`],
//! so the whole machine can be rebuilt from the last persisted snapshot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{field, restore_count, restore_date};
use super::rollover::DailyCounter;

/// Seconds removed from the countdown by every tick wake-up
pub const TICK_SECONDS: u32 = 60;

/// Phase lengths in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work_seconds: u32,
    pub break_seconds: u32,
}

impl Durations {
    pub fn from_minutes(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_seconds: work_minutes.saturating_mul(60),
            break_seconds: break_minutes.saturating_mul(60),
        }
    }

    /// Full length of the work (`true`) or break (`false`) phase
    pub fn phase(&self, is_work_mode: bool) -> u32 {
        if is_work_mode {
            self.work_seconds
        } else {
            self.break_seconds
        }
    }

    /// Older records stored the remaining time in minutes, so a value equal
    /// to either phase length in minutes is treated as stale.
    fn is_legacy_minutes(&self, value: i64) -> bool {
        value == i64::from(self.work_seconds / 60) || value == i64::from(self.break_seconds / 60)
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::from_minutes(25, 5)
    }
}

/// The four resting states of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    WorkRunning,
    WorkPaused,
    BreakRunning,
    BreakPaused,
}

/// Outcome of a phase reaching zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEnd {
    /// A work phase finished; carries the updated count for today
    WorkComplete { cycles_today: u32 },
    BreakOver,
}

/// Persisted pomodoro record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub time_left_seconds: u32,
    pub is_running: bool,
    pub is_work_mode: bool,
    pub cycles_completed_today: u32,
    pub last_reset_date: NaiveDate,
}

impl TimerState {
    /// A paused, full-length work phase with no completed cycles
    pub fn fresh(durations: Durations, today: NaiveDate) -> Self {
        Self {
            time_left_seconds: durations.work_seconds,
            is_running: false,
            is_work_mode: true,
            cycles_completed_today: 0,
            last_reset_date: today,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        match (self.is_work_mode, self.is_running) {
            (true, true) => TimerPhase::WorkRunning,
            (true, false) => TimerPhase::WorkPaused,
            (false, true) => TimerPhase::BreakRunning,
            (false, false) => TimerPhase::BreakPaused,
        }
    }

    /// Begin or resume the countdown. Returns `false` if already running.
    ///
    /// A paused phase resumes exactly where it stopped. A countdown sitting at
    /// zero starts a fresh work phase instead.
    pub fn start(&mut self, durations: Durations) -> bool {
        if self.is_running {
            return false;
        }
        if self.time_left_seconds == 0 {
            self.is_work_mode = true;
            self.time_left_seconds = durations.work_seconds;
        }
        self.is_running = true;
        true
    }

    /// Stop the countdown, keeping the remaining time. Returns `false` if
    /// already paused.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Back to a paused, full work phase. Today's cycle count is untouched.
    pub fn reset(&mut self, durations: Durations) {
        self.is_running = false;
        self.is_work_mode = true;
        self.time_left_seconds = durations.work_seconds;
    }

    /// Advance a running countdown by `elapsed_seconds`
    pub fn tick(&mut self, elapsed_seconds: u32, durations: Durations) -> Option<CycleEnd> {
        if !self.is_running {
            return None;
        }
        self.time_left_seconds = self.time_left_seconds.saturating_sub(elapsed_seconds);
        if self.time_left_seconds == 0 {
            Some(self.end_cycle(durations))
        } else {
            None
        }
    }

    fn end_cycle(&mut self, durations: Durations) -> CycleEnd {
        self.is_running = false;
        if self.is_work_mode {
            self.cycles_completed_today += 1;
            self.is_work_mode = false;
            self.time_left_seconds = durations.break_seconds;
            CycleEnd::WorkComplete {
                cycles_today: self.cycles_completed_today,
            }
        } else {
            self.is_work_mode = true;
            self.time_left_seconds = durations.work_seconds;
            CycleEnd::BreakOver
        }
    }

    /// Rebuild the timer from a persisted record.
    ///
    /// Missing records produce a fresh state. A remaining time that is
    /// missing, non-numeric, negative, beyond the phase length or left over
    /// from the minute-based schema is replaced by the full phase length.
    /// The result is always paused.
    pub fn restore(record: Option<&Value>, durations: Durations, today: NaiveDate) -> Self {
        let Some(record) = record.and_then(Value::as_object) else {
            return Self::fresh(durations, today);
        };

        let is_work_mode = field(record, &["isWorkMode"])
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let full = durations.phase(is_work_mode);
        let time_left_seconds = match field(record, &["timeLeftSeconds", "timeLeft"]).and_then(Value::as_i64) {
            Some(secs) if (0..=i64::from(full)).contains(&secs) && !durations.is_legacy_minutes(secs) => secs as u32,
            other => {
                tracing::debug!("Discarding stored time left {:?}, using {}s", other, full);
                full
            }
        };

        Self {
            time_left_seconds,
            is_running: false,
            is_work_mode,
            cycles_completed_today: restore_count(
                field(record, &["cyclesCompletedToday", "pomodorosCompleted"]),
                u32::MAX,
            ),
            last_reset_date: restore_date(
                field(record, &["lastResetDate", "lastPomodoroResetDate"]),
                today,
            ),
        }
    }
}

impl DailyCounter for TimerState {
    fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }

    fn roll_over(&mut self, today: NaiveDate) {
        self.cycles_completed_today = 0;
        self.last_reset_date = today;
    }
}
