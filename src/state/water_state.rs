//! Daily water intake counter

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::{field, restore_count, restore_date};
use super::rollover::DailyCounter;

/// Result of logging one glass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterLog {
    Logged { count: u32 },
    /// This glass reached the daily goal
    GoalReached { count: u32 },
    /// The goal was already met, nothing was counted
    AlreadyMet { count: u32 },
}

impl WaterLog {
    pub fn count(&self) -> u32 {
        match *self {
            WaterLog::Logged { count } | WaterLog::GoalReached { count } | WaterLog::AlreadyMet { count } => count,
        }
    }
}

/// Persisted water record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterState {
    pub glasses_logged_today: u32,
    pub last_reset_date: NaiveDate,
}

impl WaterState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            glasses_logged_today: 0,
            last_reset_date: today,
        }
    }

    pub fn goal_met(&self, max_glasses: u32) -> bool {
        self.glasses_logged_today >= max_glasses
    }

    /// Count one glass unless the goal is already met
    pub fn log_glass(&mut self, max_glasses: u32) -> WaterLog {
        if self.goal_met(max_glasses) {
            return WaterLog::AlreadyMet {
                count: self.glasses_logged_today,
            };
        }
        self.glasses_logged_today += 1;
        if self.goal_met(max_glasses) {
            WaterLog::GoalReached {
                count: self.glasses_logged_today,
            }
        } else {
            WaterLog::Logged {
                count: self.glasses_logged_today,
            }
        }
    }

    /// Rebuild from a persisted record, clamping the count into range
    pub fn restore(record: Option<&Value>, max_glasses: u32, today: NaiveDate) -> Self {
        let Some(record) = record.and_then(Value::as_object) else {
            return Self::fresh(today);
        };
        Self {
            glasses_logged_today: restore_count(field(record, &["glassesLoggedToday", "count"]), max_glasses),
            last_reset_date: restore_date(field(record, &["lastResetDate"]), today),
        }
    }
}

impl DailyCounter for WaterState {
    fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }

    fn roll_over(&mut self, today: NaiveDate) {
        self.glasses_logged_today = 0;
        self.last_reset_date = today;
    }
}
