//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve relative paths with fallback directory

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
///
/// # Example
/// ```ignore
/// use spongepack::utils::path::normalize_path;
/// let abs = normalize_path(Path::new("./spongeauth/static/styles/app.css"));
/// ```
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path that may be relative to cwd or a fallback directory.
///
/// Always returns an absolute path.
///
/// Tries in order:
/// 1. If absolute, use as-is
/// 2. If exists relative to cwd, normalize to absolute
/// 3. Otherwise, resolve relative to fallback_dir
///
/// # Example
/// ```ignore
/// use spongepack::utils::path::resolve_path;
/// // User passes --source static, fallback is the project root
/// let resolved = resolve_path(Path::new("static"), project_root);
/// ```
#[inline]
pub fn resolve_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    // Absolute path: use as-is
    if path.is_absolute() {
        return path.to_path_buf();
    }

    // Try cwd-relative first (running from a subdirectory)
    if path.exists() {
        return normalize_path(path);
    }

    // Fall back to fallback_dir-relative
    normalize_path(&fallback_dir.join(path))
}

/// Render a path relative to `root` for log output.
///
/// Falls back to the full path when it is not under `root`.
#[inline]
pub fn display_rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Join a relative path's components with forward slashes.
///
/// Emitted URLs (sourceMappingURL comments) always use `/`, regardless
/// of the platform separator.
pub fn rel_url(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if path is a temp/backup file (editor artifacts).
///
/// The copiers skip these and the watcher never reacts to them.
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_path_absolute() {
        let path = Path::new("/absolute/path");
        let resolved = resolve_path(path, Path::new("/fallback"));
        assert_eq!(resolved, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_resolve_path_fallback() {
        // Non-existent relative path should use fallback
        let path = Path::new("nonexistent/path");
        let resolved = resolve_path(path, Path::new("/fallback"));
        assert_eq!(resolved, PathBuf::from("/fallback/nonexistent/path"));
    }

    #[test]
    fn test_display_rel_under_root() {
        let rendered = display_rel(
            Path::new("/project/static/styles/app.css"),
            Path::new("/project/static"),
        );
        assert_eq!(rendered, "styles/app.css");
    }

    #[test]
    fn test_display_rel_outside_root() {
        let rendered = display_rel(Path::new("/elsewhere/font.woff2"), Path::new("/project"));
        assert_eq!(rendered, "/elsewhere/font.woff2");
    }

    #[test]
    fn test_rel_url() {
        assert_eq!(rel_url(Path::new("app.js")), "app.js");
        assert_eq!(rel_url(Path::new("lib/vendor.js")), "lib/vendor.js");
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("/src/app.css.bak")));
        assert!(is_temp_file(Path::new("/src/.app.css.swp")));
        assert!(is_temp_file(Path::new("/src/app.css~")));
        assert!(is_temp_file(Path::new("/src/.hidden.css")));
        assert!(!is_temp_file(Path::new("/src/app.css")));
        assert!(!is_temp_file(Path::new("/src/backup.css")));
    }
}
