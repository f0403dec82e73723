//! Wake-up dispatch background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{scheduler::Wakeup, state::AppState};

/// Feed fired wake-ups to the coordinator, one at a time, in arrival order
pub async fn wakeup_dispatch_task(state: Arc<AppState>, mut fired: mpsc::UnboundedReceiver<Wakeup>) {
    info!("Starting wake-up dispatch task");

    while let Some(wakeup) = fired.recv().await {
        debug!("Wake-up fired: {}", wakeup);
        if let Err(e) = state.handle_wakeup(wakeup) {
            error!("Failed to handle {}: {}", wakeup, e);
        }
    }

    info!("Wake-up channel closed, dispatch task exiting");
}
