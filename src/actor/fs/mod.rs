//! FileSystem Actor
//!
//! Watches the asset tree and sends debounced rebuild requests to the
//! RebuildActor. The watcher starts before the initial build finishes,
//! so changes made during that build are buffered instead of lost.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → Classifier (unit routing) → RebuildMsg
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::RebuildMsg;
use crate::config::PipelineConfig;

// Unit routing (raw changes -> rebuild targets).
mod classifier;
// Pure timing and deduplication.
mod debouncer;
// Watch root attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use classifier::EventClassifier;
use debouncer::Debouncer;
use watch_roots::WatchRoots;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    /// Watch-root consistency layer (attach/re-attach root directories)
    watch_roots: WatchRoots,
    /// Channel to send messages to RebuildActor
    rebuild_tx: mpsc::Sender<RebuildMsg>,
    /// Debouncer state
    debouncer: Debouncer,
    /// Pipeline configuration for unit routing
    config: Arc<PipelineConfig>,
}

impl FsActor {
    /// Create a new FsActor with the watcher already running.
    ///
    /// Events buffer in `notify_rx` while the caller performs the initial
    /// build, nothing that changes during it is missed.
    pub fn new(
        roots: Vec<PathBuf>,
        rebuild_tx: mpsc::Sender<RebuildMsg>,
        config: Arc<PipelineConfig>,
    ) -> notify::Result<Self> {
        // Sync channel because notify does not speak async
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        // Watch whatever exists now, missing roots are re-attached later
        let mut watch_roots = WatchRoots::new(roots);
        watch_roots.attach_existing(&mut watcher)?;

        let debouncer = Debouncer::new(config.watch.debounce(), config.watch.cooldown());

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            rebuild_tx,
            debouncer,
            config,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            rebuild_tx,
            mut debouncer,
            config,
        } = self;

        let mut events = bridge_events(notify_rx);

        loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(debouncer.sleep_duration()) => {
                    // Re-attach any roots that appeared since the last tick.
                    watch_roots.reconcile(&mut watcher);
                    // Route whatever is ready to the rebuild actor.
                    if flush_changes(&mut debouncer, &rebuild_tx, &config).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Pump notify's sync channel into an async one on a dedicated thread.
fn bridge_events(
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
) -> mpsc::Receiver<notify::Event> {
    let (async_tx, async_rx) = mpsc::channel::<notify::Event>(64);

    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if async_tx.blocking_send(event).is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        }
    });

    async_rx
}

/// Flush debounced changes to the rebuild actor.
///
/// Returns `Err(())` if the RebuildActor shut down
async fn flush_changes(
    debouncer: &mut Debouncer,
    rebuild_tx: &mpsc::Sender<RebuildMsg>,
    config: &PipelineConfig,
) -> Result<(), ()> {
    // Raw events from the debouncer (pure timing)
    let Some(raw_changes) = debouncer.take_if_ready() else {
        return Ok(());
    };

    // Route to units (business logic)
    let categories = EventClassifier::rebuild_targets(raw_changes, config);
    if categories.is_empty() {
        return Ok(());
    }

    rebuild_tx
        .send(RebuildMsg::Rebuild(categories))
        .await
        .map_err(|_| ())
}
