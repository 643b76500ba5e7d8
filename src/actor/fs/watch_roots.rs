use std::path::PathBuf;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// Keeps the desired watch roots attached across directory churn.
///
/// A root that does not exist yet (the fonts subtree of a project
/// without local fonts, an externs directory created later) is picked
/// up once it appears. A root that is deleted and recreated gets a
/// fresh handle, the old one died with the inode.
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(desired: Vec<PathBuf>) -> Self {
        Self {
            desired,
            attached: FxHashSet::default(),
        }
    }

    /// Attach every root that currently exists. Errors here are fatal,
    /// the caller is still setting up.
    pub(super) fn attach_existing(
        &mut self,
        watcher: &mut RecommendedWatcher,
    ) -> notify::Result<()> {
        let present: Vec<_> = self
            .desired
            .iter()
            .filter(|path| path.exists())
            .cloned()
            .collect();

        for path in present {
            watcher.watch(&path, RecursiveMode::Recursive)?;
            self.attached.insert(path);
        }
        Ok(())
    }

    /// Drop handles for roots that vanished, attach roots that appeared.
    pub(super) fn reconcile(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }

            match watcher.watch(path, RecursiveMode::Recursive) {
                Ok(()) => {
                    self.attached.insert(path.clone());
                    crate::debug!("watch"; "attached root: {}", path.display());
                }
                Err(e) => {
                    crate::logger::status_warning(&format!(
                        "cannot watch {}: {e}",
                        path.display()
                    ));
                }
            }
        }
    }
}
