//! Watch command implementation.
//!
//! Runs the actor system on the main thread until Ctrl+C. The default
//! invocation (no subcommand) goes through here too, with an initial
//! full build before the watch loop.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::actor::Coordinator;
use crate::config::PipelineConfig;
use crate::core::{BuildMode, register_watch_channel};
use crate::log;

/// Start watch mode, blocking until shutdown.
pub fn watch_pipeline(
    config: Arc<PipelineConfig>,
    mode: BuildMode,
    build_first: bool,
) -> Result<()> {
    // Wire Ctrl+C to a graceful actor shutdown
    let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded::<()>();
    register_watch_channel(shutdown_tx);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        let mut coordinator =
            Coordinator::with_config(config, mode).with_shutdown_signal(shutdown_rx);
        if build_first {
            coordinator = coordinator.with_initial_build();
        }
        if let Err(e) = coordinator.run().await {
            log!("actor"; "error: {}", e);
        }
    });

    Ok(())
}
