// Signal handling module
//
// One cross-platform cancellation path: ctrl-c (and SIGTERM on Unix) funnels
// into the same shutdown signal the operator URI uses.

use crate::config::AppState;
use crate::logger;
use std::sync::Arc;

/// Spawn the background task that waits for a termination signal and
/// requests shutdown through the server context.
pub fn start_signal_handler(state: Arc<AppState>) {
    tokio::spawn(async move {
        wait_for_termination().await;
        logger::log_warning("Termination signal received, shutting down");
        state.request_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    let _ = tokio::signal::ctrl_c().await;
}
