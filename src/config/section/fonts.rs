//! `[fonts]` section configuration.
//!
//! Fonts come from two places: the `fonts/` subtree of the asset source
//! (if present) and vendor package directories listed here.
//!
//! # Example
//!
//! ```toml
//! [fonts]
//! vendor = [
//!     # every file in the directory
//!     "third_party/fonts",
//!     # only files matching the stem pattern
//!     { dir = "node_modules/font-awesome/fonts", pattern = "fontawesome-webfont.*" },
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

use super::expect_relative;

/// Vendor font settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Vendor directories to copy font files from.
    pub vendor: Vec<VendorEntry>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            vendor: vec![
                VendorEntry::Full {
                    dir: PathBuf::from("node_modules/font-awesome/fonts"),
                    pattern: String::from("fontawesome-webfont.*"),
                },
                VendorEntry::Full {
                    dir: PathBuf::from("node_modules/bootstrap-sass/assets/fonts/bootstrap"),
                    pattern: String::from("glyphicons-halflings-regular.*"),
                },
            ],
        }
    }
}

impl FontsConfig {
    pub const FIELD_VENDOR: FieldPath = FieldPath::new("fonts.vendor");

    /// Validate path safety before normalization.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        for entry in &self.vendor {
            expect_relative(entry.dir(), Self::FIELD_VENDOR, diag);
        }
    }

    /// Normalize vendor directories relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        for entry in &mut self.vendor {
            entry.normalize(root);
        }
    }
}

// ============================================================================
// Vendor Entry
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorEntry {
    /// Simple path string: copy every file in the directory.
    Simple(PathBuf),
    /// Directory plus a file name pattern.
    Full {
        /// Vendor directory (relative to the project root).
        dir: PathBuf,
        /// File name pattern. A trailing `.*` matches any extension of
        /// the stem; anything else is an exact name.
        pattern: String,
    },
}

impl VendorEntry {
    /// Get the vendor directory path.
    pub fn dir(&self) -> &Path {
        match self {
            Self::Simple(p) => p,
            Self::Full { dir, .. } => dir,
        }
    }

    /// Check whether a file name is covered by this entry.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::Simple(_) => true,
            Self::Full { pattern, .. } => {
                if let Some(stem) = pattern.strip_suffix(".*") {
                    file_name
                        .strip_prefix(stem)
                        .is_some_and(|rest| rest.starts_with('.'))
                } else {
                    file_name == pattern
                }
            }
        }
    }

    /// Normalize the directory relative to the project root.
    pub fn normalize(&mut self, root: &Path) {
        match self {
            Self::Simple(p) => {
                *p = crate::utils::path::normalize_path(&root.join(&*p));
            }
            Self::Full { dir, .. } => {
                *dir = crate::utils::path::normalize_path(&root.join(&*dir));
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_vendor_packages() {
        let config = test_parse_config("");
        assert_eq!(config.fonts.vendor.len(), 2);
        assert_eq!(
            config.fonts.vendor[0].dir(),
            Path::new("node_modules/font-awesome/fonts")
        );
    }

    #[test]
    fn test_stem_pattern_matches_any_extension() {
        let entry = VendorEntry::Full {
            dir: PathBuf::from("node_modules/font-awesome/fonts"),
            pattern: String::from("fontawesome-webfont.*"),
        };

        assert!(entry.matches("fontawesome-webfont.woff2"));
        assert!(entry.matches("fontawesome-webfont.eot"));
        assert!(!entry.matches("fontawesome-webfont"));
        assert!(!entry.matches("FontAwesome.otf"));
        assert!(!entry.matches("fontawesome-webfont-old.woff"));
    }

    #[test]
    fn test_exact_pattern() {
        let entry = VendorEntry::Full {
            dir: PathBuf::from("vendor"),
            pattern: String::from("icons.woff2"),
        };
        assert!(entry.matches("icons.woff2"));
        assert!(!entry.matches("icons.woff"));
    }

    #[test]
    fn test_simple_entry_matches_everything() {
        let entry = VendorEntry::Simple(PathBuf::from("third_party/fonts"));
        assert!(entry.matches("anything.ttf"));
        assert_eq!(entry.dir(), Path::new("third_party/fonts"));
    }

    #[test]
    fn test_vendor_entry_from_toml() {
        let config = test_parse_config(
            "[fonts]\nvendor = [\"extra/fonts\", { dir = \"node_modules/x\", pattern = \"y.*\" }]",
        );
        assert_eq!(config.fonts.vendor.len(), 2);
        assert!(matches!(config.fonts.vendor[0], VendorEntry::Simple(_)));
        assert!(matches!(config.fonts.vendor[1], VendorEntry::Full { .. }));
    }
}
