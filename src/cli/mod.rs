//! Command-line interface module.

mod args;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands};
