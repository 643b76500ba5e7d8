//! Mtime-based freshness detection for copied assets.
//!
//! Fonts and images are opaque binaries, so modification times are the
//! cheapest reliable signal for "does the output need refreshing".

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `true` if A exists and is newer than B
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_get_mtime_missing_file() {
        assert!(get_mtime(Path::new("/nonexistent/file.woff2")).is_none());
    }

    #[test]
    fn test_is_newer_than_orders_by_mtime() {
        let dir = TempDir::new().unwrap();
        let older = dir.path().join("older.png");
        let newer = dir.path().join("newer.png");

        fs::write(&older, "a").unwrap();
        thread::sleep(Duration::from_millis(10));
        fs::write(&newer, "b").unwrap();

        assert!(is_newer_than(&newer, &older));
        assert!(!is_newer_than(&older, &newer));
    }

    #[test]
    fn test_is_newer_than_missing_side() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("font.eot");
        fs::write(&existing, "x").unwrap();

        assert!(!is_newer_than(&existing, Path::new("/nonexistent")));
        assert!(!is_newer_than(Path::new("/nonexistent"), &existing));
    }
}
