//! Request router: maps protocol requests onto coordinator operations

use tracing::debug;

use super::protocol::{Request, Response};
use crate::{error::Result, state::AppState};

/// Run one request against the coordinator. Rollover, persistence and
/// broadcasting happen inside the coordinator operation.
pub async fn dispatch(state: &AppState, request: Request) -> Result<Response> {
    debug!("Handling {:?}", request);
    let response = match request {
        Request::GetPomodoroState => Response::Pomodoro(state.pomodoro_state()?),
        Request::StartPomodoro => Response::Pomodoro(state.start_pomodoro()?),
        Request::PausePomodoro => Response::Pomodoro(state.pause_pomodoro()?),
        Request::ResetPomodoro => Response::Pomodoro(state.reset_pomodoro()?),
        Request::GetWaterCount => Response::Water {
            count: state.water_count()?,
        },
        Request::LogWater => Response::Water {
            count: state.log_water()?,
        },
        Request::GetNextAlarmTimes => Response::AlarmTimes(state.next_alarm_times().await?),
        Request::GetStretchGifs => Response::Stretches {
            gifs: state.stretch_selection()?,
        },
        Request::GetExercise => Response::Exercise {
            exercise: state.exercise_selection()?,
        },
        Request::NotificationClicked { notification_id } => Response::Interaction {
            follow_up: state.handle_notification_click(&notification_id)?,
        },
        Request::NotificationButtonClicked {
            notification_id,
            button_index,
        } => Response::Interaction {
            follow_up: state.handle_notification_button(&notification_id, button_index)?,
        },
    };
    Ok(response)
}
