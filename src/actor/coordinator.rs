//! Wiring for the watch-mode actor pair.
//!
//! The coordinator holds no pipeline logic of its own (that lives in
//! `pipeline/`). It builds the channel, starts the two actors with the
//! watcher attached first, runs the optional initial build, and waits
//! for shutdown:
//!
//! ```text
//! FsActor --RebuildMsg--> RebuildActor
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::RebuildMsg;
use super::rebuild::RebuildActor;
use crate::config::{PipelineConfig, clear_clean_flag};
use crate::core::{AssetCategory, BuildMode};
use crate::pipeline;

/// Rebuild message queue depth
const CHANNEL_BUFFER: usize = 32;

/// Builds and runs the watch-mode actor system.
pub struct Coordinator {
    config: Arc<PipelineConfig>,
    mode: BuildMode,
    /// Run a full build before entering the watch loop
    initial_build: bool,
    /// Ctrl+C signal from the sync side
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<PipelineConfig>, mode: BuildMode) -> Self {
        Self {
            config,
            mode,
            initial_build: false,
            shutdown_rx: None,
        }
    }

    /// Run a full build before the watch loop starts.
    pub fn with_initial_build(mut self) -> Self {
        self.initial_build = true;
        self
    }

    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(mut self) -> Result<()> {
        let (rebuild_tx, rebuild_rx) = mpsc::channel::<RebuildMsg>(CHANNEL_BUFFER);

        let watch_roots = self.watch_roots();
        for root in &watch_roots {
            crate::debug!("watch"; "root: {}", root.display());
        }

        // Watcher first: changes made during the initial build buffer in
        // the notify channel instead of being lost
        let fs_actor = FsActor::new(watch_roots, rebuild_tx.clone(), Arc::clone(&self.config))
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let rebuild_actor = RebuildActor::new(rebuild_rx, self.mode);

        if self.initial_build {
            // A failed first build does not abort the watch, the next
            // save gets another chance
            if let Err(e) = pipeline::run_build_with(&self.config, self.mode) {
                crate::log!("error"; "initial build failed: {:#}", e);
            }
            // Rebuilds go back to freshness-gated copies
            clear_clean_flag();
        }

        crate::log!("watch"; "watching for changes (Ctrl+C to stop)");

        // Run actors until shutdown signal
        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        let _ = run_actors(fs_actor, rebuild_actor, rebuild_tx, shutdown_rx).await;

        crate::debug!("actor"; "stopped");
        Ok(())
    }

    /// Directories the watcher covers.
    ///
    /// Vendor package directories are deliberately absent: node_modules
    /// churn would flood the debouncer with irrelevant events. Missing
    /// roots are fine, they attach once they appear.
    fn watch_roots(&self) -> Vec<PathBuf> {
        let paths = &self.config.paths;
        let mut roots: Vec<PathBuf> = AssetCategory::ALL
            .into_iter()
            .map(|category| paths.input_dir(category))
            .collect();

        // Externs gate the compile in production, changing them must
        // re-verify the entry script
        if self.mode.verify_globals {
            roots.push(self.config.externs_dir().to_path_buf());
        }

        roots
    }
}

/// Run all actors concurrently
async fn run_actors(
    fs: FsActor,
    rebuild: RebuildActor,
    rebuild_tx: mpsc::Sender<RebuildMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    // Keep the rebuild handle so an in-flight unit can finish on shutdown
    let rebuild_handle = tokio::spawn(async move { rebuild.run().await });
    let fs_handle = tokio::spawn(async move { fs.run().await });

    // The Ctrl+C handler lives on a plain thread, so its crossbeam
    // channel is polled rather than awaited
    if let Some(rx) = shutdown_rx {
        loop {
            if rx.try_recv().is_ok() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    } else {
        // No shutdown signal, run until the watcher side stops
        let _ = fs_handle.await;
    }

    // Let the RebuildActor drain, then stop waiting for it
    let _ = rebuild_tx.send(RebuildMsg::Shutdown).await;
    let _ = tokio::time::timeout(std::time::Duration::from_millis(500), rebuild_handle).await;

    Ok(())
}
