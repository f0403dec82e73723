//! DeskFit - background coordinator for healthy work habits
//!
//! This library owns the Pomodoro timer, the stretch/exercise/water reminder
//! schedule and the daily counters, and exposes them to short-lived UI
//! surfaces over a message channel.
//!
//! # Collaborators
//!
//! [`AppState::boot`] takes its platform services as trait objects. Each
//! trait ships a production implementation and a deterministic in-process
//! one; both are supported for embedding the coordinator:
//!
//! | Trait | Production | In-process |
//! |---|---|---|
//! | [`store::StateStore`] | [`store::JsonFileStore`] | [`store::MemoryStore`] (also `--ephemeral`) |
//! | [`scheduler::WakeupService`] | [`scheduler::TokioWakeups`] | [`scheduler::ManualWakeups`] |
//! | [`notify::Notifier`] | [`notify::DesktopNotifier`], [`notify::LogNotifier`] | [`notify::RecordingNotifier`] |
//! | [`clock::Clock`] | [`clock::SystemClock`] | [`clock::FixedClock`] |
//!
//! The in-process ones let a host replay a day of wake-ups and alert
//! interactions against real coordinator logic without timers or a desktop.

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{CoordinatorError, StoreError};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
