//! Desktop and log-only notifiers

use notify_rust::{Notification, Timeout};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{Alert, AlertResponse, Interaction, NotificationId, Notifier};

/// Action key the notification server reports for a click on the body
pub const BODY_ACTION: &str = "default";
/// Action key of the alert's single button
pub const PRIMARY_ACTION: &str = "primary";

/// Shows alerts through the desktop notification service.
///
/// Alerts stay up until interacted with. Each visible alert owns a thread
/// that blocks on the notification bus and reports the user's click or
/// button press over the channel returned by [`DesktopNotifier::new`].
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    icon: String,
    responses: mpsc::UnboundedSender<AlertResponse>,
}

impl DesktopNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AlertResponse>) {
        let (responses, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            app_name: "deskfit".to_string(),
            icon: "alarm-clock".to_string(),
            responses,
        };
        (notifier, rx)
    }
}

/// Map an action key from the notification server to an interaction
pub fn interaction_for(key: &str) -> Option<Interaction> {
    match key {
        BODY_ACTION => Some(Interaction::Clicked),
        PRIMARY_ACTION => Some(Interaction::Button(0)),
        _ => None,
    }
}

impl Notifier for DesktopNotifier {
    fn present(&self, alert: &Alert) -> Result<(), String> {
        let mut notification = Notification::new();
        notification
            .summary(&alert.title)
            .body(&alert.message)
            .appname(&self.app_name)
            .icon(&self.icon)
            .timeout(Timeout::Never);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification
                .urgency(notify_rust::Urgency::Critical)
                .action(BODY_ACTION, "Open");
            if let Some(action) = alert.action {
                notification.action(PRIMARY_ACTION, action.label);
            }
        }

        let id = alert.id;
        let responses = self.responses.clone();
        std::thread::Builder::new()
            .name(format!("notify-{}", id.kind.prefix()))
            .spawn(move || show_and_wait(notification, id, responses))
            .map(|_| ())
            .map_err(|e| format!("Failed to spawn notification thread: {}", e))
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show_and_wait(notification: Notification, id: NotificationId, responses: mpsc::UnboundedSender<AlertResponse>) {
    let handle = match notification.show() {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Desktop notification {} was rejected: {}", id, e);
            return;
        }
    };
    handle.wait_for_action(|key| match interaction_for(key) {
        Some(interaction) => {
            if responses.send((id, interaction)).is_err() {
                debug!("Coordinator gone, dropping {:?} on {}", interaction, id);
            }
        }
        None => debug!("Notification {} closed with {}", id, key),
    });
}

// Platforms without action callbacks only show the alert.
#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show_and_wait(notification: Notification, id: NotificationId, _responses: mpsc::UnboundedSender<AlertResponse>) {
    if let Err(e) = notification.show() {
        warn!("Desktop notification {} was rejected: {}", id, e);
    }
}

/// Writes alerts to the log instead of showing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn present(&self, alert: &Alert) -> Result<(), String> {
        match alert.action {
            Some(action) => info!("[{}] {}: {} ({})", alert.id, alert.title, alert.message, action.label),
            None => info!("[{}] {}: {}", alert.id, alert.title, alert.message),
        }
        Ok(())
    }
}
