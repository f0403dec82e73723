//! Notification dispatcher
//!
//! Turns coordinator events into alerts. Each alert carries a
//! [`NotificationId`] that encodes its kind, so clicks and button presses can
//! be routed back without any lookup table.

pub mod desktop;
pub mod recording;

use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, warn};

pub use desktop::{DesktopNotifier, LogNotifier};
pub use recording::RecordingNotifier;

/// Every alert the coordinator can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    WorkComplete,
    BreakOver,
    StretchDue,
    ExerciseDue,
    WaterDue,
    WaterGoalReached,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 6] = [
        NotificationKind::WorkComplete,
        NotificationKind::BreakOver,
        NotificationKind::StretchDue,
        NotificationKind::ExerciseDue,
        NotificationKind::WaterDue,
        NotificationKind::WaterGoalReached,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            NotificationKind::WorkComplete => "work-complete",
            NotificationKind::BreakOver => "break-over",
            NotificationKind::StretchDue => "stretch-due",
            NotificationKind::ExerciseDue => "exercise-due",
            NotificationKind::WaterDue => "water-due",
            NotificationKind::WaterGoalReached => "water-goal-reached",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    /// The single button an alert of this kind offers, if any
    pub fn action(&self) -> Option<Action> {
        match self {
            NotificationKind::StretchDue => Some(Action {
                label: "Start Stretching",
                follow_up: FollowUp::OpenView { view: View::Stretch },
            }),
            NotificationKind::ExerciseDue => Some(Action {
                label: "Start Exercise",
                follow_up: FollowUp::OpenView { view: View::Exercise },
            }),
            NotificationKind::WaterDue => Some(Action {
                label: "Log Water",
                follow_up: FollowUp::LogWater,
            }),
            _ => None,
        }
    }

    /// What clicking the alert body asks for
    pub fn body_follow_up(&self) -> Option<FollowUp> {
        match self {
            NotificationKind::StretchDue => Some(FollowUp::OpenView { view: View::Stretch }),
            NotificationKind::ExerciseDue => Some(FollowUp::OpenView { view: View::Exercise }),
            NotificationKind::WaterDue | NotificationKind::WorkComplete | NotificationKind::BreakOver => {
                Some(FollowUp::OpenView { view: View::Popup })
            }
            NotificationKind::WaterGoalReached => None,
        }
    }
}

impl Serialize for NotificationKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.prefix())
    }
}

/// How the user responded to a shown alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The alert body
    Clicked,
    /// A button, by position
    Button(u32),
}

/// An interaction reported back by the notification surface
pub type AlertResponse = (NotificationId, Interaction);

/// UI surfaces a follow-up can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Popup,
    Stretch,
    Exercise,
}

/// Command triggered by interacting with an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FollowUp {
    OpenView { view: View },
    LogWater,
}

/// A labelled button on an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub label: &'static str,
    pub follow_up: FollowUp,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Malformed notification id: {0}")]
pub struct InvalidNotificationId(pub String);

/// Kind plus a correlation stamp, rendered as `<kind>_<stamp>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId {
    pub kind: NotificationKind,
    pub correlation: i64,
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.prefix(), self.correlation)
    }
}

impl FromStr for NotificationId {
    type Err = InvalidNotificationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidNotificationId(s.to_string());
        let (prefix, stamp) = s.rsplit_once('_').ok_or_else(invalid)?;
        Ok(Self {
            kind: NotificationKind::from_prefix(prefix).ok_or_else(invalid)?,
            correlation: stamp.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for NotificationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NotificationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Counters quoted in alert text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertContext {
    pub cycles_today: u32,
    pub glasses_today: u32,
    pub max_glasses: u32,
}

/// A fully rendered alert ready for a [`Notifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub action: Option<Action>,
}

impl Alert {
    fn render(id: NotificationId, ctx: AlertContext) -> Self {
        let (title, message) = match id.kind {
            NotificationKind::WorkComplete => (
                "Pomodoro: Work Complete!".to_string(),
                format!("Pomodoros today: {}. Time for a break!", ctx.cycles_today),
            ),
            NotificationKind::BreakOver => (
                "Pomodoro: Break Over!".to_string(),
                "Time to get back to work!".to_string(),
            ),
            NotificationKind::StretchDue => (
                "Stretch Time!".to_string(),
                "Click to start your stretches.".to_string(),
            ),
            NotificationKind::ExerciseDue => (
                "Exercise Break!".to_string(),
                "Time for a quick exercise.".to_string(),
            ),
            NotificationKind::WaterDue => (
                "Stay Hydrated!".to_string(),
                format!("Drank: {}/{}. Log more?", ctx.glasses_today, ctx.max_glasses),
            ),
            NotificationKind::WaterGoalReached => (
                "Hydration Goal!".to_string(),
                format!("Awesome! {} glasses!", ctx.max_glasses),
            ),
        };
        Self {
            id,
            title,
            message,
            action: id.kind.action(),
        }
    }
}

/// Platform surface that shows and removes alerts
pub trait Notifier: Send + Sync {
    fn present(&self, alert: &Alert) -> Result<(), String>;

    fn dismiss(&self, id: &NotificationId) -> Result<(), String> {
        debug!("Dismissed {}", id);
        Ok(())
    }
}

pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    last_stamp: AtomicI64,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            last_stamp: AtomicI64::new(0),
        }
    }

    /// Microsecond timestamp, bumped so no two ids ever share a stamp
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(now.max(last + 1)))
            .unwrap_or(now);
        now.max(previous + 1)
    }

    /// Raise an alert. Presentation failures are logged and dropped.
    pub fn notify(&self, kind: NotificationKind, ctx: AlertContext) -> NotificationId {
        let id = NotificationId {
            kind,
            correlation: self.next_stamp(),
        };
        let alert = Alert::render(id, ctx);
        match self.notifier.present(&alert) {
            Ok(()) => debug!("Presented {}", id),
            Err(e) => warn!("Failed to present notification {}: {}", id, e),
        }
        id
    }

    /// The alert body was clicked
    pub fn click(&self, id: &NotificationId) -> Option<FollowUp> {
        self.dismiss(id);
        id.kind.body_follow_up()
    }

    /// A button was pressed. Only the first button exists.
    pub fn press(&self, id: &NotificationId, button_index: u32) -> Option<FollowUp> {
        self.dismiss(id);
        match button_index {
            0 => id.kind.action().map(|action| action.follow_up),
            _ => None,
        }
    }

    pub fn respond(&self, id: &NotificationId, interaction: Interaction) -> Option<FollowUp> {
        match interaction {
            Interaction::Clicked => self.click(id),
            Interaction::Button(index) => self.press(id, index),
        }
    }

    fn dismiss(&self, id: &NotificationId) {
        if let Err(e) = self.notifier.dismiss(id) {
            warn!("Failed to dismiss notification {}: {}", id, e);
        }
    }
}
