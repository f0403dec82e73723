//! Alert interaction background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{notify::AlertResponse, state::AppState};

/// Route clicks and button presses on shown alerts back into the coordinator
pub async fn alert_interaction_task(state: Arc<AppState>, mut responses: mpsc::UnboundedReceiver<AlertResponse>) {
    info!("Starting alert interaction task");

    while let Some((id, interaction)) = responses.recv().await {
        match state.handle_interaction(id, interaction) {
            Ok(Some(follow_up)) => info!("{} answered with {:?}", id, follow_up),
            Ok(None) => debug!("{:?} on {} needs no follow-up", interaction, id),
            Err(e) => error!("Failed to handle {:?} on {}: {}", interaction, id, e),
        }
    }

    info!("Alert interaction channel closed, task exiting");
}
