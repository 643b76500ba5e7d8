//! Process state tracking for watch mode.
//!
//! Two orthogonal concerns:
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `SHUTDOWN_TX`: Channel for waking the actor system on shutdown

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<crossbeam::channel::Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a watch channel has been registered:
/// - Before `register_watch_channel()`: Sets SHUTDOWN flag, process exits immediately
/// - After `register_watch_channel()`: Graceful shutdown (notify actors, let the
///   watch loop drain)
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        // Notify actor system
        if let Some(tx) = SHUTDOWN_TX.get() {
            crate::log!("watch"; "shutting down...");
            let _ = tx.send(());
        } else {
            // No watch loop registered yet (e.g., during config prompt
            // or a one-shot build). Nothing to gracefully shutdown.
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the watch-mode shutdown channel
///
/// Call this before entering the watch loop
pub fn register_watch_channel(shutdown_tx: crossbeam::channel::Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
///
/// Relaxed load: workers poll this between items, a stale read only
/// delays the stop by one item
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag_starts_clear() {
        assert!(!is_shutdown());
    }

    #[test]
    fn test_register_watch_channel_is_idempotent() {
        let (tx, _rx) = crossbeam::channel::bounded(1);
        register_watch_channel(tx);

        // Second registration is ignored, not a panic
        let (tx2, _rx2) = crossbeam::channel::bounded(1);
        register_watch_channel(tx2);
    }
}
