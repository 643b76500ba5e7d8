//! Actor system for watch mode.
//!
//! Message-passing concurrency between the watcher and the rebuilds:
//!
//! ```text
//! FsActor --> RebuildActor
//! (watch)     (pipeline units)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `fs` - File system watcher with debouncing
//! - `rebuild` - Serial per-unit rebuilds with status reporting
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod rebuild;

pub use coordinator::Coordinator;
