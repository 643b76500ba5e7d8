//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! entry = "app.css"   # entry stylesheet, relative to the styles input dir
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::FieldPath;

/// Stylesheet bundling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Entry stylesheet, relative to the styles input directory.
    /// Imports are resolved and inlined from here.
    pub entry: PathBuf,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("app.css"),
        }
    }
}

impl StylesConfig {
    pub const FIELD_ENTRY: FieldPath = FieldPath::new("styles.entry");
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::test_parse_config;

    #[test]
    fn test_styles_config_default() {
        let config = test_parse_config("");
        assert_eq!(config.styles.entry, Path::new("app.css"));
    }

    #[test]
    fn test_styles_config_override() {
        let config = test_parse_config("[styles]\nentry = \"main.css\"");
        assert_eq!(config.styles.entry, Path::new("main.css"));
    }
}
