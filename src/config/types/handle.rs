//! Global config with atomic replacement support.
//!
//! Uses `arc-swap` for lock-free reads. The config is loaded once at
//! startup and read from every worker and actor without locking.

use crate::config::PipelineConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<PipelineConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(PipelineConfig::default()));

#[inline]
pub fn cfg() -> Arc<PipelineConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: PipelineConfig) -> Arc<PipelineConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

/// Clear the clean flag after the initial build.
///
/// Watch-mode rebuilds then go back to freshness-checked copies instead
/// of re-copying every file on each change.
pub fn clear_clean_flag() {
    let mut config = (*cfg()).clone();
    config.clean = false;
    CONFIG.store(Arc::new(config));
}
