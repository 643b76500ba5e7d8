//! Spongepack - the SpongeAuth front-end asset pipeline.

#![allow(dead_code)]

mod actor;
mod cli;
mod config;
mod core;
mod externs;
mod identity;
mod logger;
mod pipeline;
mod signin;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PipelineConfig, init_config};
use core::{AssetCategory, BuildMode};
use pipeline::UnitReport;
use utils::plural_s;

fn main() -> Result<()> {
    // Ctrl+C handler goes in before anything can block
    core::setup_shutdown_handler()?;

    // Leaked once, shared everywhere as &'static
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // TTY detection stays in charge
    }

    let config = init_config(PipelineConfig::load(cli)?);
    let mode = cli.mode();

    match &cli.command {
        None => cli::watch::watch_pipeline(config, mode, true),
        Some(Commands::Build) => pipeline::run_build(mode),
        Some(Commands::Watch) => cli::watch::watch_pipeline(config, mode, false),
        Some(Commands::Styles) => run_single_unit(AssetCategory::Styles, mode),
        Some(Commands::Scripts) => run_single_unit(AssetCategory::Scripts, mode),
        Some(Commands::Fonts) => run_single_unit(AssetCategory::Fonts, mode),
        Some(Commands::Images) => run_single_unit(AssetCategory::Images, mode),
    }
}

/// Run one pipeline unit and report the result.
fn run_single_unit(category: AssetCategory, mode: BuildMode) -> Result<()> {
    match pipeline::run_unit(category, mode) {
        UnitReport::Succeeded { files, duration } => {
            log!("build"; "{}: {} file{} in {}ms",
                category.name(), files, plural_s(files), duration.as_millis());
            Ok(())
        }
        UnitReport::Failed { error } => Err(error),
    }
}
