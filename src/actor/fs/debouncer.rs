use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::utils::path::{is_temp_file, normalize_path};

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// How a new event folds into an already-pending one for the same path.
enum Merge {
    /// First event wins, pending kind stays
    Keep,
    /// Pending kind is replaced
    Replace(ChangeKind),
    /// The pair cancels out, drop the path entirely
    Discard,
}

fn merge(existing: ChangeKind, incoming: ChangeKind) -> Merge {
    match (existing, incoming) {
        // Deleted then restored: the restore is what matters
        (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
            Merge::Replace(incoming)
        }
        // Tracked file edited then deleted: upgrade to a removal
        (ChangeKind::Modified, ChangeKind::Removed) => Merge::Replace(ChangeKind::Removed),
        // Appeared and vanished within one window: net no-op
        (ChangeKind::Created, ChangeKind::Removed) => Merge::Discard,
        _ => Merge::Keep,
    }
}

/// Pure debouncer: timing and per-path deduplication only.
/// Routing decisions live in the classifier.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<std::path::PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    pub(super) last_rebuild: Option<Instant>,
    /// Quiet time required before pending changes are released
    debounce: Duration,
    /// Minimum gap between consecutive rebuild batches
    cooldown: Duration,
}

impl Debouncer {
    pub(super) fn new(debounce: Duration, cooldown: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_rebuild: None,
            debounce,
            cooldown,
        }
    }

    /// Fold a notify event into the pending change set.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // Metadata-only changes (mtime/atime/chmod) carry no content.
                // Reacting to them can loop a rebuild against its own output
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            let path = normalize_path(path);

            match self.changes.get(&path).copied() {
                None => {
                    crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
                    self.changes.insert(path, kind);
                }
                Some(existing) => match merge(existing, kind) {
                    Merge::Keep => continue,
                    Merge::Replace(next) => {
                        crate::debug!("watch"; "merge {}+{} -> {}: {}",
                            existing.label(), kind.label(), next.label(), path.display());
                        self.changes.insert(path, next);
                    }
                    Merge::Discard => {
                        crate::debug!("watch"; "discard {}+{}: {}",
                            existing.label(), kind.label(), path.display());
                        self.changes.remove(&path);
                    }
                },
            }
            self.last_event = Some(Instant::now());
        }
    }

    /// Take the pending changes if debounce and cooldown have elapsed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<std::path::PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);

        // An all-discarded window starts no cooldown
        (!changes.is_empty()).then(|| {
            self.last_rebuild = Some(Instant::now());
            changes
        })
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        if let Some(last_rebuild) = self.last_rebuild
            && last_rebuild.elapsed() < self.cooldown
        {
            return false;
        }

        !self.changes.is_empty()
    }

    /// Precise sleep until the pending set can next be released.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            // Nothing pending, park until an event arrives
            return Duration::from_secs(86400);
        };

        let debounce_remaining = self.debounce.saturating_sub(last_event.elapsed());

        let cooldown_remaining = self
            .last_rebuild
            .map(|t| self.cooldown.saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}
