//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! debounce_ms = 300   # quiet time before pending changes are processed
//! cooldown_ms = 800   # minimum gap between consecutive rebuild batches
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// File watcher timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Milliseconds of quiet time before pending changes are processed.
    /// Editors often emit several events per save, this batches them.
    pub debounce_ms: u64,

    /// Minimum milliseconds between consecutive rebuild batches.
    pub cooldown_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 800,
        }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
