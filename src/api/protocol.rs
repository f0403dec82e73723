//! Message protocol between UI surfaces and the coordinator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    notify::FollowUp,
    state::{AlarmTimes, TimerState},
};

/// Requests a UI surface can send, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    GetPomodoroState,
    StartPomodoro,
    PausePomodoro,
    ResetPomodoro,
    GetWaterCount,
    LogWater,
    GetNextAlarmTimes,
    GetStretchGifs,
    GetExercise,
    #[serde(rename_all = "camelCase")]
    NotificationClicked { notification_id: String },
    #[serde(rename_all = "camelCase")]
    NotificationButtonClicked { notification_id: String, button_index: u32 },
}

impl Request {
    /// Whether handling this request can change coordinator state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Request::StartPomodoro
                | Request::PausePomodoro
                | Request::ResetPomodoro
                | Request::LogWater
                | Request::NotificationClicked { .. }
                | Request::NotificationButtonClicked { .. }
        )
    }
}

/// Response payloads, serialized without a wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Pomodoro(TimerState),
    Water {
        count: u32,
    },
    AlarmTimes(AlarmTimes),
    Stretches {
        gifs: Vec<&'static str>,
    },
    Exercise {
        exercise: &'static str,
    },
    Interaction {
        #[serde(rename = "followUp")]
        follow_up: Option<FollowUp>,
    },
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_parse_from_tagged_objects() {
        let request: Request = serde_json::from_value(json!({ "type": "GET_POMODORO_STATE" })).unwrap();
        assert_eq!(request, Request::GetPomodoroState);

        let request: Request = serde_json::from_value(json!({
            "type": "NOTIFICATION_BUTTON_CLICKED",
            "notificationId": "water-due_17",
            "buttonIndex": 0
        }))
        .unwrap();
        assert_eq!(
            request,
            Request::NotificationButtonClicked {
                notification_id: "water-due_17".to_string(),
                button_index: 0
            }
        );
        assert!(request.is_mutation());
    }

    #[test]
    fn unknown_types_do_not_parse() {
        assert!(serde_json::from_value::<Request>(json!({ "type": "MAKE_COFFEE" })).is_err());
        assert!(serde_json::from_value::<Request>(json!({ "kind": "LOG_WATER" })).is_err());
    }

    #[test]
    fn responses_are_bare_payloads() {
        assert_eq!(
            serde_json::to_value(Response::Water { count: 3 }).unwrap(),
            json!({ "count": 3 })
        );
        assert_eq!(
            serde_json::to_value(Response::Exercise { exercise: "squats.gif" }).unwrap(),
            json!({ "exercise": "squats.gif" })
        );
        assert_eq!(
            serde_json::to_value(Response::Interaction { follow_up: None }).unwrap(),
            json!({ "followUp": null })
        );
    }
}
