//! DeskFit - background coordinator for healthy work habits
//!
//! This is the main entry point for the deskfit daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use deskfit::{
    api::create_router,
    clock::SystemClock,
    config::Config,
    notify::{DesktopNotifier, LogNotifier, Notifier},
    scheduler::TokioWakeups,
    state::{AppState, Collaborators},
    store::{JsonFileStore, MemoryStore, StateStore},
    tasks::{alert_interaction_task, wakeup_dispatch_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("deskfit={},tower_http=info", config.log_level()))
        .init();

    config.validate().map_err(anyhow::Error::msg)?;

    info!("Starting deskfit coordinator v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: work={}min, break={}min, stretch every {}min, exercise every {}min, water every {}min, goal={} glasses",
        config.work_minutes,
        config.break_minutes,
        config.stretch_interval,
        config.exercise_interval,
        config.water_interval,
        config.max_glasses
    );

    let (notifier, interactions) = if config.no_desktop_notifications {
        (Arc::new(LogNotifier) as Arc<dyn Notifier>, None)
    } else {
        let (desktop, interactions) = DesktopNotifier::new();
        (Arc::new(desktop) as Arc<dyn Notifier>, Some(interactions))
    };
    let (wakeups, fired) = TokioWakeups::new();
    let store: Arc<dyn StateStore> = if config.ephemeral {
        info!("Ephemeral mode, state will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(&config.state_file))
    };

    // Load persisted state and schedule the wake-ups
    let state = Arc::new(AppState::boot(
        config.settings(),
        Collaborators {
            store,
            wakeups: Arc::new(wakeups),
            notifier,
            clock: Arc::new(SystemClock),
        },
    ));

    // Start the wake-up dispatch background task
    tokio::spawn(wakeup_dispatch_task(Arc::clone(&state), fired));

    // Clicks on desktop alerts come back through their own task
    if let Some(interactions) = interactions {
        tokio::spawn(alert_interaction_task(Arc::clone(&state), interactions));
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Message channel on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /message - Send a request to the coordinator");
    info!("  GET  /events  - Stream POMODORO_UPDATE / WATER_UPDATE / ALERT events");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.persist_all() {
        tracing::error!("Failed to persist state on shutdown: {}", e);
    }
    info!("Coordinator shutdown complete");
    Ok(())
}
