//! `[scripts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! entry = "app.js"            # entry script, relative to the scripts input dir
//! externs = "closureexterns"  # externs directory, relative to the project root
//! target = "es2015"           # syntax target for down-leveling
//! vendor = ["lib/gapi-shim.js"]   # copied verbatim, never compiled
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

use super::expect_relative;

/// Script compilation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Entry script, relative to the scripts input directory.
    pub entry: PathBuf,

    /// Directory of externs declaration files, relative to the project root.
    /// Every `.js` file in it contributes ambient global declarations.
    pub externs: PathBuf,

    /// Syntax target for down-leveling (e.g., "es2015").
    pub target: String,

    /// Vendor scripts copied verbatim to the output, relative to the
    /// scripts input directory. Never parsed or minified.
    pub vendor: Vec<PathBuf>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("app.js"),
            externs: PathBuf::from("closureexterns"),
            target: String::from("es2015"),
            vendor: Vec::new(),
        }
    }
}

impl ScriptsConfig {
    pub const FIELD_ENTRY: FieldPath = FieldPath::new("scripts.entry");
    pub const FIELD_EXTERNS: FieldPath = FieldPath::new("scripts.externs");
    pub const FIELD_VENDOR: FieldPath = FieldPath::new("scripts.vendor");

    /// Validate path safety before normalization.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        expect_relative(&self.externs, Self::FIELD_EXTERNS, diag);
        expect_relative(&self.entry, Self::FIELD_ENTRY, diag);
        for vendor in &self.vendor {
            expect_relative(vendor, Self::FIELD_VENDOR, diag);
        }
    }

    /// Normalize the externs directory relative to the project root.
    ///
    /// The entry and vendor paths stay relative, they are joined with the
    /// scripts input directory on demand.
    pub fn normalize(&mut self, root: &Path) {
        self.externs = crate::utils::path::normalize_path(&root.join(&self.externs));
    }
}
