//! Recurring reminder scheduler
//!
//! Owns the four named wake-ups. Which ones exist is always derived from the
//! current water record, never tracked separately.

pub mod manual;
pub mod tokio_wakeups;

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{config::ReminderIntervals, state::WaterState};

pub use manual::ManualWakeups;
pub use tokio_wakeups::TokioWakeups;

/// Label used when a wake-up is not currently scheduled
pub const PENDING_LABEL: &str = "Pending...";
/// Label used when the lookup failed or timed out
pub const ERROR_LABEL: &str = "Err";
/// Upper bound on a scheduled-time lookup
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// The named recurring wake-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wakeup {
    #[serde(rename = "pomodoroAlarm")]
    Pomodoro,
    #[serde(rename = "stretchAlarm")]
    Stretch,
    #[serde(rename = "exerciseAlarm")]
    Exercise,
    #[serde(rename = "waterAlarm")]
    Water,
}

impl Wakeup {
    pub const ALL: [Wakeup; 4] = [Wakeup::Pomodoro, Wakeup::Stretch, Wakeup::Exercise, Wakeup::Water];

    pub fn name(&self) -> &'static str {
        match self {
            Wakeup::Pomodoro => "pomodoroAlarm",
            Wakeup::Stretch => "stretchAlarm",
            Wakeup::Exercise => "exerciseAlarm",
            Wakeup::Water => "waterAlarm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name() == name)
    }
}

impl fmt::Display for Wakeup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First firing after `delay`, then every `period`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeupSpec {
    pub delay: Duration,
    pub period: Duration,
}

impl WakeupSpec {
    pub fn every_minutes(minutes: u32) -> Self {
        let period = Duration::from_secs(u64::from(minutes) * 60);
        Self { delay: period, period }
    }
}

/// Platform service delivering named periodic wake-ups
#[async_trait]
pub trait WakeupService: Send + Sync {
    /// Schedule `wakeup`, replacing any existing one of the same name
    fn create(&self, wakeup: Wakeup, spec: WakeupSpec);

    /// Returns whether something was cleared
    fn clear(&self, wakeup: Wakeup) -> bool;

    fn clear_all(&self);

    fn is_scheduled(&self, wakeup: Wakeup) -> bool;

    /// Next firing time, `None` if not scheduled
    async fn scheduled_time(&self, wakeup: Wakeup) -> Result<Option<DateTime<Local>>, String>;
}

/// Keeps the wake-up service in line with the coordinator's records
pub struct ReminderScheduler {
    service: Arc<dyn WakeupService>,
    intervals: ReminderIntervals,
    max_glasses: u32,
}

impl ReminderScheduler {
    pub fn new(service: Arc<dyn WakeupService>, intervals: ReminderIntervals, max_glasses: u32) -> Self {
        Self {
            service,
            intervals,
            max_glasses,
        }
    }

    /// The exact set of wake-ups that should exist for `water`
    pub fn desired(&self, water: &WaterState) -> Vec<(Wakeup, WakeupSpec)> {
        let mut wanted = vec![
            (Wakeup::Pomodoro, WakeupSpec::every_minutes(1)),
            (Wakeup::Stretch, WakeupSpec::every_minutes(self.intervals.stretch_minutes)),
            (Wakeup::Exercise, WakeupSpec::every_minutes(self.intervals.exercise_minutes)),
        ];
        if !water.goal_met(self.max_glasses) {
            wanted.push((Wakeup::Water, WakeupSpec::every_minutes(self.intervals.water_minutes)));
        }
        wanted
    }

    /// Clear every wake-up and recreate the desired set
    pub fn resync(&self, water: &WaterState) {
        self.service.clear_all();
        let wanted = self.desired(water);
        for (wakeup, spec) in &wanted {
            self.service.create(*wakeup, *spec);
        }
        info!(
            "Wake-ups scheduled: {:?}",
            wanted.iter().map(|(w, _)| w.name()).collect::<Vec<_>>()
        );
    }

    /// Add or retire only the water wake-up, leaving the others' phase alone
    pub fn sync_water(&self, water: &WaterState) {
        if water.goal_met(self.max_glasses) {
            self.retire_water();
        } else if !self.service.is_scheduled(Wakeup::Water) {
            self.service
                .create(Wakeup::Water, WakeupSpec::every_minutes(self.intervals.water_minutes));
            info!("Water reminders re-enabled");
        }
    }

    pub fn retire_water(&self) {
        if self.service.clear(Wakeup::Water) {
            info!("Water goal met, water reminders retired for today");
        }
    }

    pub fn is_scheduled(&self, wakeup: Wakeup) -> bool {
        self.service.is_scheduled(wakeup)
    }

    /// Next firing of `wakeup` as local `HH:MM`, or a fallback label
    pub async fn next_fire_label(&self, wakeup: Wakeup, timeout: Duration) -> String {
        match tokio::time::timeout(timeout, self.service.scheduled_time(wakeup)).await {
            Ok(Ok(Some(at))) => at.format("%H:%M").to_string(),
            Ok(Ok(None)) => {
                debug!("{} is not scheduled", wakeup);
                PENDING_LABEL.to_string()
            }
            Ok(Err(e)) => {
                warn!("Failed to look up {}: {}", wakeup, e);
                ERROR_LABEL.to_string()
            }
            Err(_) => {
                warn!("Lookup of {} timed out", wakeup);
                ERROR_LABEL.to_string()
            }
        }
    }
}
