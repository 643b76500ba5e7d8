//! Build mode configuration for production/development builds.

/// Build mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMode {
    /// Whether to minify emitted CSS and JS.
    pub minify: bool,

    /// Whether to verify script globals against the externs surface
    /// before mangling can rename them away.
    pub verify_globals: bool,
}

impl BuildMode {
    /// Production mode: minified output, globals verified against externs.
    pub const PRODUCTION: Self = Self {
        minify: true,
        verify_globals: true,
    };

    /// Development mode: readable output, fast iteration.
    pub const DEVELOPMENT: Self = Self {
        minify: false,
        verify_globals: false,
    };

    /// Check if this is production mode.
    #[inline]
    pub const fn is_production(&self) -> bool {
        self.minify
    }
}
