//! Images unit: mirror the images subtree into the output.

use super::copy::{CopyJob, collect_dir_jobs};
use crate::config::PipelineConfig;
use crate::core::AssetCategory;

/// Collect a copy job for every image in the source tree.
pub fn collect_jobs(config: &PipelineConfig) -> Vec<CopyJob> {
    collect_dir_jobs(
        &config.paths.input_dir(AssetCategory::Images),
        &config.paths.output_dir(AssetCategory::Images),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_nested_images_keep_their_layout() {
        let dir = TempDir::new().unwrap();
        let mut config = PipelineConfig::default();
        config.set_root(dir.path());
        config.paths.source = dir.path().join("static");
        config.paths.output = dir.path().join("static-build");

        let src = config.paths.input_dir(AssetCategory::Images);
        fs::create_dir_all(src.join("avatars")).unwrap();
        fs::write(src.join("spongie.png"), "png").unwrap();
        fs::write(src.join("avatars/default.png"), "png").unwrap();

        let mut jobs = collect_jobs(&config);
        jobs.sort_by(|a, b| a.dest.cmp(&b.dest));

        let out = config.paths.output_dir(AssetCategory::Images);
        let dests: Vec<_> = jobs.iter().map(|j| j.dest.clone()).collect();
        assert_eq!(
            dests,
            vec![out.join("avatars/default.png"), out.join("spongie.png")]
        );
    }
}
