//! Asset category definitions.

/// Category of pipeline asset, determines build strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Font files - copied from vendor packages
    Fonts,
    /// Stylesheets - bundled and printed with lightningcss
    Styles,
    /// Scripts - parsed, down-leveled and minified with oxc
    Scripts,
    /// Images - copied from the source tree
    Images,
}

impl AssetCategory {
    /// All categories in build order.
    pub const ALL: [Self; 4] = [Self::Fonts, Self::Styles, Self::Scripts, Self::Images];

    /// Display name for this category.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fonts => "fonts",
            Self::Styles => "styles",
            Self::Scripts => "scripts",
            Self::Images => "images",
        }
    }

    /// Returns true for categories that copy files instead of compiling them.
    pub fn is_copied(self) -> bool {
        matches!(self, Self::Fonts | Self::Images)
    }
}
