//! Background tasks module
//!
//! Loops that feed platform callbacks (wake-ups, alert interactions) into the
//! coordinator alongside the HTTP server.

pub mod alert_interactions;
pub mod wakeup_dispatch;

pub use alert_interactions::alert_interaction_task;
pub use wakeup_dispatch::wakeup_dispatch_task;
