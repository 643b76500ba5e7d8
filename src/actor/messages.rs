//! Actor message definitions.
//!
//! ```text
//! FsActor --Rebuild--> RebuildActor
//! ```

use crate::core::AssetCategory;

/// Messages to the Rebuild Actor
#[derive(Debug, PartialEq, Eq)]
pub enum RebuildMsg {
    /// Rebuild the listed units, already deduplicated and in build order
    Rebuild(Vec<AssetCategory>),
    /// Finish the current unit, then stop
    Shutdown,
}
