//! Rebuild Actor
//!
//! Receives rebuild requests from the FsActor and runs the named
//! pipeline units serially, in build order. Each unit's outcome lands
//! on the watch status line; a failed unit does not stop the ones
//! queued after it, the next save gets another chance.

use tokio::sync::mpsc;

use super::messages::RebuildMsg;
use crate::core::{AssetCategory, BuildMode, is_shutdown};
use crate::logger::{status_error, status_success, status_unchanged};
use crate::pipeline::{self, UnitReport};
use crate::utils::plural_s;

/// Rebuild Actor - runs pipeline units on demand
pub struct RebuildActor {
    rebuild_rx: mpsc::Receiver<RebuildMsg>,
    mode: BuildMode,
}

impl RebuildActor {
    pub fn new(rebuild_rx: mpsc::Receiver<RebuildMsg>, mode: BuildMode) -> Self {
        Self { rebuild_rx, mode }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rebuild_rx.recv().await {
            match msg {
                RebuildMsg::Rebuild(categories) => {
                    for category in categories {
                        if is_shutdown() {
                            return;
                        }
                        report_unit(category, pipeline::run_unit(category, self.mode));
                    }
                }
                RebuildMsg::Shutdown => break,
            }
        }
    }
}

/// Put a unit's outcome on the watch status line.
fn report_unit(category: AssetCategory, report: UnitReport) {
    let name = category.name();
    match report {
        // A copy unit that copied nothing means the change was already
        // reflected (or concerned a deleted file)
        UnitReport::Succeeded { files: 0, .. } if category.is_copied() => {
            status_unchanged(&format!("unchanged: {name}"));
        }
        UnitReport::Succeeded { files, duration } => {
            status_success(&format!(
                "rebuilt: {name} ({files} file{}, {}ms)",
                plural_s(files),
                duration.as_millis()
            ));
        }
        UnitReport::Failed { error } => {
            status_error(&format!("failed: {name}"), &format!("{error:#}"));
        }
    }
}
