//! Notifier that keeps what it was asked to show
//!
//! Lets a host inspect raised alerts and answer them through
//! [`AppState::handle_interaction`](crate::state::AppState::handle_interaction).

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use super::{Alert, NotificationId, NotificationKind, Notifier};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
    dismissed: Mutex<Vec<NotificationId>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following presentation
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.alerts().iter().map(|alert| alert.id.kind).collect()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn dismissed(&self) -> Vec<NotificationId> {
        self.dismissed.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn present(&self, alert: &Alert) -> Result<(), String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("notifications are blocked".to_string());
        }
        self.alerts
            .lock()
            .map_err(|e| e.to_string())?
            .push(alert.clone());
        Ok(())
    }

    fn dismiss(&self, id: &NotificationId) -> Result<(), String> {
        self.dismissed.lock().map_err(|e| e.to_string())?.push(*id);
        Ok(())
    }
}
