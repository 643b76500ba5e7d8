//! Configuration section definitions.
//!
//! Each module corresponds to a section in `spongepack.toml`:
//!
//! | Module    | TOML Section  | Purpose                              |
//! |-----------|---------------|--------------------------------------|
//! | `paths`   | `[paths]`     | Source/output tree layout            |
//! | `styles`  | `[styles]`    | Stylesheet bundling                  |
//! | `scripts` | `[scripts]`   | Script compilation, externs, vendor  |
//! | `fonts`   | `[fonts]`     | Vendor font packages                 |
//! | `watch`   | `[watch]`     | File watcher timing                  |

mod fonts;
mod paths;
mod scripts;
mod styles;
mod watch;

// Re-export section configs
pub use fonts::{FontsConfig, VendorEntry};
pub use paths::PathsConfig;
pub use scripts::ScriptsConfig;
pub use styles::StylesConfig;
pub use watch::WatchConfig;

use std::path::{Component, Path};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Check a configured path for unsafe components (`..` or absolute).
///
/// All configured paths are interpreted relative to the project root, so
/// anything that could escape it is rejected before normalization.
fn expect_relative(path: &Path, field: FieldPath, diag: &mut ConfigDiagnostics) {
    for comp in path.components() {
        let msg = match comp {
            Component::ParentDir => Some("parent directory '..' not allowed"),
            Component::Prefix(_) | Component::RootDir => Some("absolute paths not allowed"),
            _ => None,
        };
        if let Some(reason) = msg {
            diag.error(field, format!("path '{}': {reason}", path.display()));
        }
    }
}
