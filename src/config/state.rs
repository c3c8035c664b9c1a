// Application state module
// The explicit server context handed to every handler: configuration plus
// the process-wide shutdown state. The shutdown flag is set at most once.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

use super::types::Config;

/// Application state shared across the accept loop and request handlers
pub struct AppState {
    pub config: Config,
    pub document_root: PathBuf,
    /// Woken once when shutdown is requested; observed by the accept loop
    pub shutdown: Notify,
    shutdown_requested: AtomicBool,
    /// Cached for lock-free access on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let document_root = PathBuf::from(&config.server.document_root);
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            document_root,
            shutdown: Notify::new(),
            shutdown_requested: AtomicBool::new(false),
            cached_access_log,
        }
    }

    /// Signal the transport to stop accepting new work.
    ///
    /// `notify_one` stores a permit, so the accept loop sees the signal even
    /// when it is not parked on `notified()` at this instant.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_shutdown_flag_set_once() {
        let state = AppState::new(Config::default_for_tests());
        assert!(!state.shutdown_requested());
        state.request_shutdown();
        assert!(state.shutdown_requested());
        // A second request is a no-op, not an error
        state.request_shutdown();
        assert!(state.shutdown_requested());
    }
}
