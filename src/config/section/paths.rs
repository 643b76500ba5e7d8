//! `[paths]` section configuration.
//!
//! Maps each asset category to its input subtree under the source root
//! and its output subtree under the build root.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! source = "spongeauth/static"        # asset source root
//! output = "spongeauth/static-build"  # build output root
//! maps = "maps"                       # source map directory under output
//! styles = "styles"                   # per-category subdirectory names
//! scripts = "scripts"
//! fonts = "fonts"
//! images = "images"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::AssetCategory;

use super::expect_relative;

/// Source and output tree layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the asset source tree.
    pub source: PathBuf,

    /// Root of the build output tree.
    pub output: PathBuf,

    /// Source map directory name under the output root.
    pub maps: PathBuf,

    /// Subdirectory name for stylesheets (same under source and output).
    pub styles: PathBuf,

    /// Subdirectory name for scripts.
    pub scripts: PathBuf,

    /// Subdirectory name for fonts.
    pub fonts: PathBuf,

    /// Subdirectory name for images.
    pub images: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("spongeauth/static"),
            output: PathBuf::from("spongeauth/static-build"),
            maps: PathBuf::from("maps"),
            styles: PathBuf::from("styles"),
            scripts: PathBuf::from("scripts"),
            fonts: PathBuf::from("fonts"),
            images: PathBuf::from("images"),
        }
    }
}

impl PathsConfig {
    pub const FIELD_SOURCE: FieldPath = FieldPath::new("paths.source");
    pub const FIELD_OUTPUT: FieldPath = FieldPath::new("paths.output");
    pub const FIELD_MAPS: FieldPath = FieldPath::new("paths.maps");

    /// Subdirectory name for a category.
    fn subdir(&self, category: AssetCategory) -> &Path {
        match category {
            AssetCategory::Styles => &self.styles,
            AssetCategory::Scripts => &self.scripts,
            AssetCategory::Fonts => &self.fonts,
            AssetCategory::Images => &self.images,
        }
    }

    /// Input subtree for a category.
    pub fn input_dir(&self, category: AssetCategory) -> PathBuf {
        self.source.join(self.subdir(category))
    }

    /// Output subtree for a category.
    pub fn output_dir(&self, category: AssetCategory) -> PathBuf {
        self.output.join(self.subdir(category))
    }

    /// Directory receiving source maps.
    pub fn maps_dir(&self) -> PathBuf {
        self.output.join(&self.maps)
    }

    /// Which category's input subtree contains this path.
    ///
    /// Expects `path` and the source root in the same form (both normalized
    /// or both raw).
    pub fn category_of(&self, path: &Path) -> Option<AssetCategory> {
        AssetCategory::ALL
            .into_iter()
            .find(|&category| path.starts_with(self.input_dir(category)))
    }

    /// Validate path safety before normalization.
    ///
    /// MUST be called before `normalize()` - after normalization the roots
    /// become absolute, making this check impossible.
    pub fn validate_paths(&self, diag: &mut ConfigDiagnostics) {
        expect_relative(&self.source, Self::FIELD_SOURCE, diag);
        expect_relative(&self.output, Self::FIELD_OUTPUT, diag);
        expect_relative(&self.maps, Self::FIELD_MAPS, diag);
    }

    /// Normalize the source and output roots relative to the project root.
    ///
    /// Subdirectory names and the maps directory stay relative, they are
    /// joined on demand by the accessors above.
    pub fn normalize(&mut self, root: &Path) {
        self.source = crate::utils::path::normalize_path(&root.join(&self.source));
        self.output = crate::utils::path::normalize_path(&root.join(&self.output));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_mirror_spongeauth_tree() {
        let paths = PathsConfig::default();
        assert_eq!(paths.source, Path::new("spongeauth/static"));
        assert_eq!(paths.output, Path::new("spongeauth/static-build"));
        assert_eq!(
            paths.input_dir(AssetCategory::Styles),
            Path::new("spongeauth/static/styles")
        );
        assert_eq!(
            paths.output_dir(AssetCategory::Scripts),
            Path::new("spongeauth/static-build/scripts")
        );
        assert_eq!(paths.maps_dir(), Path::new("spongeauth/static-build/maps"));
    }

    #[test]
    fn test_category_of() {
        let paths = PathsConfig::default();
        assert_eq!(
            paths.category_of(Path::new("spongeauth/static/styles/app.css")),
            Some(AssetCategory::Styles)
        );
        assert_eq!(
            paths.category_of(Path::new("spongeauth/static/images/logo/sponge.png")),
            Some(AssetCategory::Images)
        );
        assert_eq!(
            paths.category_of(Path::new("spongeauth/static/other.txt")),
            None
        );
    }

    #[test]
    fn test_validate_paths_rejects_escapes() {
        let mut paths = PathsConfig::default();
        paths.source = PathBuf::from("../outside");

        let mut diag = ConfigDiagnostics::new();
        paths.validate_paths(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_paths_rejects_absolute() {
        let mut paths = PathsConfig::default();
        paths.output = PathBuf::from("/var/www/static-build");

        let mut diag = ConfigDiagnostics::new();
        paths.validate_paths(&mut diag);
        assert!(diag.has_errors());
    }
}
