//! Config file discovery.

use std::path::{Path, PathBuf};

/// Locate the config file, walking up from the current directory.
///
/// An absolute `config_name` that exists is taken as-is. Otherwise every
/// ancestor of cwd is tried in turn, so the pipeline can be invoked from
/// anywhere inside the project tree:
///
/// ```text
/// /home/user/spongeauth/spongeauth/static/   ← cwd
/// /home/user/spongeauth/spongepack.toml      ← found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::find_config_file;

    #[test]
    fn test_absolute_path_is_taken_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("spongepack.toml");
        std::fs::write(&file, "[paths]\n").unwrap();

        assert_eq!(find_config_file(&file), Some(file.clone()));
    }

    #[test]
    fn test_missing_absolute_path_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("absent.toml");

        // Not on disk anywhere up the tree either
        assert_eq!(find_config_file(&file), None);
    }
}
