//! The four build units and their orchestration.
//!
//! | Unit    | Strategy                                    |
//! |---------|---------------------------------------------|
//! | fonts   | copy from source tree and vendor packages   |
//! | styles  | bundle entry stylesheet with lightningcss   |
//! | scripts | compile entry script with oxc, copy vendor  |
//! | images  | copy the images subtree                     |
//!
//! A full build runs all four in parallel behind a shared progress line.
//! Watch mode rebuilds single units serially through [`run_unit`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

pub mod copy;
mod fonts;
mod images;
mod report;
mod scripts;
mod styles;

pub use report::UnitReport;

use copy::CopyJob;

use crate::config::{PipelineConfig, cfg};
use crate::core::{AssetCategory, BuildMode, is_shutdown};
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::path::rel_url;

// ============================================================================
// full build
// ============================================================================

/// Run all four units against the active configuration.
pub fn run_build(mode: BuildMode) -> Result<()> {
    run_build_with(&cfg(), mode)
}

/// Run all four units in parallel.
///
/// The first failing file logs its error, everything else aborts quietly.
pub fn run_build_with(config: &PipelineConfig, mode: BuildMode) -> Result<()> {
    let plan = BuildPlan::collect(config);
    let progress = plan.create_progress();
    let clean = config.clean;
    let has_error = AtomicBool::new(false);

    let (copy_results, compile_results) = rayon::join(
        || {
            rayon::join(
                || process_copy_jobs("fonts", &plan.fonts, clean, &has_error, Some(&progress)),
                || process_copy_jobs("images", &plan.images, clean, &has_error, Some(&progress)),
            )
        },
        || {
            rayon::join(
                || {
                    process_compile("styles", &has_error, || {
                        styles::build(config, mode, Some(&progress))
                    })
                },
                || {
                    process_compile("scripts", &has_error, || {
                        scripts::build(config, mode, Some(&progress))
                    })
                },
            )
        },
    );

    progress.finish();

    let (fonts_result, images_result) = copy_results;
    let (styles_result, scripts_result) = compile_results;
    fonts_result?;
    images_result?;
    styles_result?;
    scripts_result?;

    log_build_result(&config.paths.output)?;
    Ok(())
}

/// Everything a build is going to touch, collected up front so the
/// progress line knows its totals.
struct BuildPlan {
    fonts: Vec<CopyJob>,
    images: Vec<CopyJob>,
    styles_planned: usize,
    scripts_planned: usize,
}

impl BuildPlan {
    fn collect(config: &PipelineConfig) -> Self {
        Self {
            fonts: fonts::collect_jobs(config),
            images: images::collect_jobs(config),
            styles_planned: 1,
            scripts_planned: 1 + config.scripts.vendor.len(),
        }
    }

    fn create_progress(&self) -> ProgressLine {
        ProgressLine::new(&[
            ("fonts", self.fonts.len()),
            ("styles", self.styles_planned),
            ("scripts", self.scripts_planned),
            ("images", self.images.len()),
        ])
    }
}

/// Copy jobs in parallel with shared error short-circuiting.
fn process_copy_jobs(
    name: &'static str,
    jobs: &[CopyJob],
    clean: bool,
    has_error: &AtomicBool,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let copied = AtomicUsize::new(0);
    jobs.par_iter().try_for_each(|job| {
        if is_shutdown() || has_error.load(Ordering::Relaxed) {
            return Err(anyhow!("Aborted"));
        }
        match copy::copy_job(job, clean) {
            Ok(true) => {
                copied.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => {
                if !has_error.swap(true, Ordering::Relaxed) {
                    log!("error"; "{}: {:#}", job.source.display(), e);
                }
                return Err(anyhow!("Build failed"));
            }
        }
        if let Some(p) = progress {
            p.inc(name);
        }
        Ok(())
    })?;
    Ok(copied.load(Ordering::Relaxed))
}

/// Run one compile unit with the shared error gate.
fn process_compile<F>(name: &'static str, has_error: &AtomicBool, build: F) -> Result<usize>
where
    F: FnOnce() -> Result<usize>,
{
    if is_shutdown() || has_error.load(Ordering::Relaxed) {
        return Err(anyhow!("Aborted"));
    }
    match build() {
        Ok(files) => Ok(files),
        Err(e) => {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {:#}", name, e);
            }
            Err(anyhow!("Build failed"))
        }
    }
}

fn log_build_result(output: &Path) -> Result<()> {
    let file_count = fs::read_dir(output)?.filter_map(Result::ok).count();

    if file_count == 0 {
        log!("warning"; "output is empty, check the source tree");
    } else {
        log!("build"; "done");
    }

    Ok(())
}

// ============================================================================
// single-unit rebuild (watch mode)
// ============================================================================

/// Rebuild one unit against the active configuration.
pub fn run_unit(category: AssetCategory, mode: BuildMode) -> UnitReport {
    run_unit_with(&cfg(), category, mode)
}

/// Rebuild one unit serially, without a progress line.
pub fn run_unit_with(
    config: &PipelineConfig,
    category: AssetCategory,
    mode: BuildMode,
) -> UnitReport {
    let started = Instant::now();
    let result = match category {
        AssetCategory::Fonts => copy_all(&fonts::collect_jobs(config), config.clean),
        AssetCategory::Images => copy_all(&images::collect_jobs(config), config.clean),
        AssetCategory::Styles => styles::build(config, mode, None),
        AssetCategory::Scripts => scripts::build(config, mode, None),
    };
    UnitReport::from_result(result, started)
}

fn copy_all(jobs: &[CopyJob], clean: bool) -> Result<usize> {
    let mut copied = 0;
    for job in jobs {
        if is_shutdown() {
            return Err(anyhow!("Aborted"));
        }
        if copy::copy_job(job, clean)? {
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// shared output helpers
// ============================================================================

/// Destination of the source map for an output emitted at `rel` inside
/// its category directory: `<maps_dir>/<rel>.map`.
pub(crate) fn map_dest(maps_dir: &Path, rel: &Path) -> PathBuf {
    let mut path = maps_dir.join(rel).into_os_string();
    path.push(".map");
    PathBuf::from(path)
}

/// Relative URL from an emitted file to its source map, for the
/// sourceMappingURL comment.
pub(crate) fn map_url(maps_name: &Path, rel: &Path) -> String {
    let ups = "../".repeat(rel.components().count());
    format!("{ups}{}/{}.map", rel_url(maps_name), rel_url(rel))
}

/// Write an output file, creating parent directories as needed.
pub(crate) fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_map_dest() {
        assert_eq!(
            map_dest(Path::new("/out/maps"), Path::new("app.js")),
            PathBuf::from("/out/maps/app.js.map")
        );
        assert_eq!(
            map_dest(Path::new("/out/maps"), Path::new("lib/vendor.js")),
            PathBuf::from("/out/maps/lib/vendor.js.map")
        );
    }

    #[test]
    fn test_map_url() {
        assert_eq!(
            map_url(Path::new("maps"), Path::new("app.css")),
            "../maps/app.css.map"
        );
        assert_eq!(
            map_url(Path::new("maps"), Path::new("lib/vendor.js")),
            "../../maps/lib/vendor.js.map"
        );
    }

    fn make_tree(root: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.set_root(root);
        config.paths.source = root.join("static");
        config.paths.output = root.join("static-build");
        config.fonts.vendor = Vec::new();
        config.scripts.externs = root.join("closureexterns");

        let styles = config.paths.input_dir(AssetCategory::Styles);
        fs::create_dir_all(&styles).unwrap();
        fs::write(styles.join("app.css"), "body { margin: 0 }\n").unwrap();

        let scripts = config.paths.input_dir(AssetCategory::Scripts);
        fs::create_dir_all(&scripts).unwrap();
        fs::write(scripts.join("app.js"), "console.log('hi');\n").unwrap();

        let fonts = config.paths.input_dir(AssetCategory::Fonts);
        fs::create_dir_all(&fonts).unwrap();
        fs::write(fonts.join("brand.woff2"), "w").unwrap();

        let images = config.paths.input_dir(AssetCategory::Images);
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("spongie.png"), "png").unwrap();

        config
    }

    #[test]
    fn test_full_build_produces_every_unit() {
        let dir = TempDir::new().unwrap();
        let config = make_tree(dir.path());

        run_build_with(&config, BuildMode::DEVELOPMENT).unwrap();

        let out = &config.paths.output;
        assert!(out.join("styles/app.css").exists());
        assert!(out.join("scripts/app.js").exists());
        assert!(out.join("fonts/brand.woff2").exists());
        assert!(out.join("images/spongie.png").exists());
        assert!(out.join("maps/app.css.map").exists());
        assert!(out.join("maps/app.js.map").exists());
    }

    #[test]
    fn test_full_build_fails_on_missing_entry() {
        let dir = TempDir::new().unwrap();
        let config = make_tree(dir.path());
        fs::remove_file(config.paths.input_dir(AssetCategory::Styles).join("app.css")).unwrap();

        assert!(run_build_with(&config, BuildMode::DEVELOPMENT).is_err());
    }

    #[test]
    fn test_run_unit_reports_fresh_copies() {
        let dir = TempDir::new().unwrap();
        let config = make_tree(dir.path());

        let first = run_unit_with(&config, AssetCategory::Images, BuildMode::DEVELOPMENT);
        match first {
            UnitReport::Succeeded { files, .. } => assert_eq!(files, 1),
            UnitReport::Failed { .. } => panic!("expected success"),
        }

        // Nothing changed, so the rerun copies nothing
        let second = run_unit_with(&config, AssetCategory::Images, BuildMode::DEVELOPMENT);
        match second {
            UnitReport::Succeeded { files, .. } => assert_eq!(files, 0),
            UnitReport::Failed { .. } => panic!("expected success"),
        }
    }
}
