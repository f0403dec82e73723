//! State management module
//!
//! This module contains the persisted records, their transitions and the
//! coordinator that owns them.

pub mod app_state;
pub mod rollover;
pub mod timer_state;
pub mod water_state;
mod record;

// Re-export main types
pub use app_state::{AlarmTimes, AppState, Collaborators, CoordinatorEvent, Settings, Snapshot};
pub use rollover::{reconcile, reconcile_in_place, DailyCounter};
pub use timer_state::{CycleEnd, Durations, TimerPhase, TimerState, TICK_SECONDS};
pub use water_state::{WaterLog, WaterState};
