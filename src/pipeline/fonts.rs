//! Fonts unit: gather font files from the source tree and vendor packages.
//!
//! Vendor entries point at package directories (node_modules paths by
//! default) and select files by name pattern. Vendor directories are flat,
//! only the source tree is walked recursively.

use std::fs;
use std::path::Path;

use super::copy::{CopyJob, collect_dir_jobs};
use crate::config::{PipelineConfig, VendorEntry};
use crate::core::AssetCategory;
use crate::log;

/// Collect every font copy job for this build.
///
/// A missing vendor directory is reported and skipped, the build goes on
/// with what exists. A missing source fonts directory is simply empty.
pub fn collect_jobs(config: &PipelineConfig) -> Vec<CopyJob> {
    let dest_dir = config.paths.output_dir(AssetCategory::Fonts);
    let mut jobs = collect_dir_jobs(&config.paths.input_dir(AssetCategory::Fonts), &dest_dir);

    for entry in &config.fonts.vendor {
        collect_vendor_jobs(entry, &dest_dir, &mut jobs);
    }
    jobs
}

fn collect_vendor_jobs(entry: &VendorEntry, dest_dir: &Path, jobs: &mut Vec<CopyJob>) {
    let dir = entry.dir();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            log!("warning"; "font package not found: {}", dir.display());
            return;
        }
    };

    for file in entries.filter_map(Result::ok) {
        let path = file.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if entry.matches(name) {
            jobs.push(CopyJob {
                dest: dest_dir.join(name),
                source: path,
            });
        }
    }
}
