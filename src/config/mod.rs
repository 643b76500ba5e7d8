//! Pipeline configuration management for `spongepack.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── styles     # [styles]
//! │   ├── scripts    # [scripts]
//! │   ├── fonts      # [fonts]
//! │   └── watch      # [watch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! Every field has a default that mirrors the SpongeAuth checkout layout,
//! so running without a config file works out of the box.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{FontsConfig, PathsConfig, ScriptsConfig, StylesConfig, VendorEntry, WatchConfig};

// Re-export from types/
pub use types::{
    ConfigDiagnostics, ConfigError, FieldPath, cfg, clear_clean_flag, init_config,
};

use crate::cli::Cli;
use crate::core::AssetCategory;
use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing spongepack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CLI handle, injected by `load` rather than parsed from TOML
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path of the loaded config file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root, the directory holding the config file
    #[serde(skip)]
    pub root: PathBuf,

    /// Skip freshness checks and rewrite every output
    #[serde(skip)]
    pub clean: bool,

    /// Source/output tree layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Stylesheet bundling settings
    #[serde(default)]
    pub styles: StylesConfig,

    /// Script compilation settings
    #[serde(default)]
    pub scripts: ScriptsConfig,

    /// Vendor font settings
    #[serde(default)]
    pub fonts: FontsConfig,

    /// File watcher timing settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory, or cwd when no config file
    /// exists (the defaults then cover everything).
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        // Relative-path checks must see the raw TOML values
        config.validate_paths()?;

        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        config.validate()?;

        Ok(config)
    }

    /// Locate the config file. The bool is false when none was found and
    /// the returned path is only a placeholder under cwd.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        use anyhow::Context;

        if let Some(path) = find_config_file(&cli.config) {
            return Ok((path, true));
        }

        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Ok((cwd.join(&cli.config), false))
    }

    /// Pin the project root and make every configured path absolute.
    ///
    /// The root is the config file's directory; without a config file it
    /// falls back to cwd.
    fn finalize(&mut self, cli: &Cli) {
        let root = if self.config_path.exists() {
            self.config_path
                .parent()
                .map_or_else(PathBuf::new, Path::to_path_buf)
        } else {
            std::env::current_dir().unwrap_or_default()
        };

        self.set_root(&root);
        self.normalize_paths(&root);
        self.apply_build_args(cli);
    }

    /// Read and parse the config file, flagging fields it does not know.
    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if ignored.is_empty() {
            return Ok(config);
        }

        Self::print_unknown_fields_warning(&ignored, path);
        if Self::prompt_continue()? {
            Ok(config)
        } else {
            anyhow::bail!("Aborted due to unknown config fields")
        }
    }

    /// Parse TOML content, collecting the paths of unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // The file sits at the project root, the bare name is enough
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "ignoring unknown fields in {}:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
        eprintln!();
    }

    /// Ask whether to go on despite unknown fields. Anything but an
    /// explicit yes means no.
    fn prompt_continue() -> Result<bool> {
        use std::io::{self, Write};

        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let answer = input.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    pub fn get_root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, path: &Path) {
        self.root = path.to_path_buf();
    }

    /// Strip the project root from `path` for display. Paths outside the
    /// root pass through unchanged.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }

    /// CLI args, set once by `load`
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    // ========================================================================
    // derived paths
    // ========================================================================

    /// Absolute path of the entry stylesheet.
    pub fn styles_entry(&self) -> PathBuf {
        self.paths.input_dir(AssetCategory::Styles).join(&self.styles.entry)
    }

    /// Absolute path of the entry script.
    pub fn scripts_entry(&self) -> PathBuf {
        self.paths.input_dir(AssetCategory::Scripts).join(&self.scripts.entry)
    }

    /// Absolute path of the externs directory.
    pub fn externs_dir(&self) -> &Path {
        &self.scripts.externs
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Fold the flat CLI flags into the loaded config.
    fn apply_build_args(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.build_args.verbose);
        self.clean = cli.build_args.clean;
    }

    // ========================================================================
    // path resolution
    // ========================================================================

    /// Make every configured path absolute under the project root.
    fn normalize_paths(&mut self, root: &Path) {
        let cli = self.get_cli();

        // Normalize root to absolute path
        let root = crate::utils::path::normalize_path(root);
        self.set_root(&root);

        // CLI path overrides resolve against cwd first, then the root.
        // Config file paths are always root-relative
        if let Some(source) = &cli.source {
            self.paths.source = crate::utils::path::resolve_path(source, &root);
        }
        if let Some(output) = &cli.output {
            self.paths.output = crate::utils::path::resolve_path(output, &root);
        }

        // Normalize config path (already set in load, just canonicalize)
        self.config_path = crate::utils::path::normalize_path(&self.config_path);

        self.paths.normalize(&root);
        self.scripts.normalize(&root);
        self.fonts.normalize(&root);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Check the raw TOML paths, before normalization makes them all
    /// absolute and the relative-only rule can no longer be seen.
    fn validate_paths(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate_paths(&mut diag);
        self.scripts.validate_paths(&mut diag);
        self.fonts.validate_paths(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Check the normalized config against the real filesystem. All
    /// findings are collected into one report.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if !self.paths.source.is_dir() {
            diag.error_with_hint(
                PathsConfig::FIELD_SOURCE,
                format!("source directory '{}' not found", self.paths.source.display()),
                "run from the project root, or point --source at the asset tree",
            );
        }

        // Writing into the watched tree would re-trigger the watcher forever
        if self.paths.output.starts_with(&self.paths.source) {
            diag.error(
                PathsConfig::FIELD_OUTPUT,
                "output directory must not live inside the source tree",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// test helpers
// ============================================================================

/// Parse a TOML snippet into a config, panicking on unknown fields so
/// fixture typos fail loudly.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(extra).unwrap();
    assert!(ignored.is_empty(), "fixture has unknown fields: {ignored:?}");
    parsed
}

// ============================================================================
// tests
// ============================================================================
