//! Typed config field paths for diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// The dotted TOML path of one config field, as shown to the user.
///
/// Sections declare their field paths as associated constants, so a
/// diagnostic can only ever name a field that actually exists:
///
/// ```ignore
/// impl PathsConfig {
///     pub const FIELD_SOURCE: FieldPath = FieldPath::new("paths.source");
/// }
///
/// diag.error(PathsConfig::FIELD_SOURCE, "does not exist");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Renders as `` `paths.source` ``, tinted for terminal diagnostics.
impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticked = format!("`{}`", self.0);
        write!(f, "{}", ticked.bright_blue())
    }
}
