//! Utility modules for the asset pipeline.

pub mod freshness;
pub mod path;
pub mod plural;

// Re-export commonly used functions (used in many places)
pub use freshness::is_newer_than;
pub use path::{normalize_path, resolve_path};
pub use plural::plural_s;
