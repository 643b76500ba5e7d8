//! File copying with freshness checks.
//!
//! Fonts and images are copy units: files move from the source tree (or a
//! vendor package) to the output tree unchanged. A copy is skipped when
//! the destination exists and is at least as new as the source, unless
//! the build runs with `--clean`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

use crate::utils::is_newer_than;
use crate::utils::path::is_temp_file;

/// OS metadata junk that never belongs in the output tree.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// One source file and where it lands in the output tree.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// Collect a copy job for every file under `src_dir`, mirroring the
/// directory structure under `dest_dir`.
///
/// Hidden files and editor temp files are skipped. A missing `src_dir`
/// yields no jobs.
pub fn collect_dir_jobs(src_dir: &Path, dest_dir: &Path) -> Vec<CopyJob> {
    if !src_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(src_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter_map(|e| {
            let source = e.path();
            if is_temp_file(&source) {
                return None;
            }
            let rel = source.strip_prefix(src_dir).ok()?.to_path_buf();
            Some(CopyJob {
                dest: dest_dir.join(rel),
                source,
            })
        })
        .collect()
}

/// Copy one job unless the destination is already fresh.
///
/// Returns whether a copy actually happened.
pub fn copy_job(job: &CopyJob, clean: bool) -> Result<bool> {
    if !clean && job.dest.exists() && !is_newer_than(&job.source, &job.dest) {
        return Ok(false);
    }

    if let Some(parent) = job.dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&job.source, &job.dest).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            job.source.display(),
            job.dest.display()
        )
    })?;
    Ok(true)
}
