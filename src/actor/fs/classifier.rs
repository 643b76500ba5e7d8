use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};

use super::debouncer::ChangeKind;
use crate::config::PipelineConfig;
use crate::core::AssetCategory;

/// Turns raw debounced changes into the units that must rebuild.
///
/// Pipeline: correct_by_existence → filter_actionable → categorize
pub(super) struct EventClassifier;

impl EventClassifier {
    /// Main classification pipeline. Returns units in build order,
    /// deduplicated; empty when nothing actionable survived.
    pub(super) fn rebuild_targets(
        raw: FxHashMap<PathBuf, ChangeKind>,
        config: &PipelineConfig,
    ) -> Vec<AssetCategory> {
        let mut changes = raw;

        Self::correct_by_existence(&mut changes);
        Self::filter_actionable(&mut changes);
        crate::debug_do! {
            log_events(&changes);
        }

        Self::categorize(&changes, config)
    }

    /// Reconcile stale event kinds with what is actually on disk.
    ///
    /// By the time the debounce window closes, a Created file may be gone
    /// again, and an atomic save shows up as Removed although the path
    /// still exists.
    fn correct_by_existence(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        let snapshot: Vec<_> = changes.keys().cloned().collect();
        for path in snapshot {
            let corrected = match (changes[&path], path.exists()) {
                (ChangeKind::Created, false) => {
                    crate::debug!("watch"; "discard created (gone): {}", path.display());
                    changes.remove(&path);
                    continue;
                }
                (ChangeKind::Modified, false) => ChangeKind::Removed,
                (ChangeKind::Removed, true) => ChangeKind::Modified,
                _ => continue,
            };
            crate::debug!("watch"; "correct to {}: {}", corrected.label(), path.display());
            changes.insert(path, corrected);
        }
    }

    /// Created/Modified events must point at files, directory events only
    /// matter through the files inside them. Removals always pass, the
    /// unit rebuild re-scans its whole input anyway.
    fn filter_actionable(changes: &mut FxHashMap<PathBuf, ChangeKind>) {
        changes.retain(|path, kind| match kind {
            ChangeKind::Created | ChangeKind::Modified => path.is_file(),
            ChangeKind::Removed => true,
        });
    }

    /// Map surviving changes onto their pipeline units.
    ///
    /// Externs changes route to the scripts unit: they change which
    /// globals the compile accepts, not any source file.
    fn categorize(
        changes: &FxHashMap<PathBuf, ChangeKind>,
        config: &PipelineConfig,
    ) -> Vec<AssetCategory> {
        let mut touched = FxHashSet::default();

        for path in changes.keys() {
            if let Some(category) = config.paths.category_of(path) {
                touched.insert(category);
            } else if path.starts_with(config.externs_dir()) {
                touched.insert(AssetCategory::Scripts);
            } else {
                crate::debug!("watch"; "unrouted change: {}", path.display());
            }
        }

        AssetCategory::ALL
            .into_iter()
            .filter(|category| touched.contains(category))
            .collect()
    }
}

fn log_events(changes: &FxHashMap<PathBuf, ChangeKind>) {
    for (path, kind) in changes {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }
}
