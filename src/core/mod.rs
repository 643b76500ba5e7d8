//! Core types - pure abstractions shared across the codebase.

mod category;
mod mode;
mod state;

pub use category::AssetCategory;
pub use mode::BuildMode;
pub use state::{is_shutdown, register_watch_channel, setup_shutdown_handler};
