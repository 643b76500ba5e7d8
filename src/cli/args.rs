//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::{AssetCategory, BuildMode};

/// Spongepack asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Source directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Config file path (default: spongepack.toml)
    #[arg(short = 'C', long, default_value = "spongepack.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    #[command(flatten)]
    pub build_args: BuildArgs,

    /// Subcommand (omit to build once, then watch)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build all asset categories once
    #[command(visible_alias = "b")]
    Build,

    /// Watch source trees and rebuild categories as they change
    #[command(visible_alias = "w")]
    Watch,

    /// Bundle and print the entry stylesheet
    Styles,

    /// Compile the application script
    Scripts,

    /// Copy font files from vendor packages
    Fonts,

    /// Copy images from the source tree
    Images,
}

/// Shared build arguments, accepted by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean outputs before building (skip freshness checks)
    #[arg(short, long, global = true)]
    pub clean: bool,

    /// Produce minified output verified against the externs surface
    #[arg(short, long, global = true)]
    pub production: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Some(Commands::Watch))
    }

    pub const fn is_default(&self) -> bool {
        self.command.is_none()
    }

    /// Build mode selected by the production flag.
    pub fn mode(&self) -> BuildMode {
        if self.build_args.production {
            BuildMode::PRODUCTION
        } else {
            BuildMode::DEVELOPMENT
        }
    }

    /// Single category selected by the command, if any.
    pub fn unit(&self) -> Option<AssetCategory> {
        match self.command {
            Some(Commands::Styles) => Some(AssetCategory::Styles),
            Some(Commands::Scripts) => Some(AssetCategory::Scripts),
            Some(Commands::Fonts) => Some(AssetCategory::Fonts),
            Some(Commands::Images) => Some(AssetCategory::Images),
            Some(Commands::Build | Commands::Watch) | None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_default() {
        let cli = Cli::parse_from(["spongepack"]);
        assert!(cli.is_default());
        assert!(cli.unit().is_none());
        assert!(!cli.build_args.production);
    }

    #[test]
    fn test_production_flag_with_default_command() {
        let cli = Cli::parse_from(["spongepack", "--production"]);
        assert!(cli.mode().is_production());
    }

    #[test]
    fn test_unit_subcommands() {
        let cli = Cli::parse_from(["spongepack", "styles"]);
        assert_eq!(cli.unit(), Some(AssetCategory::Styles));

        let cli = Cli::parse_from(["spongepack", "fonts", "--clean"]);
        assert_eq!(cli.unit(), Some(AssetCategory::Fonts));
        assert!(cli.build_args.clean);
    }

    #[test]
    fn test_watch_alias() {
        let cli = Cli::parse_from(["spongepack", "w", "--production"]);
        assert!(cli.is_watch());
        assert!(cli.build_args.production);
    }
}
