//! Styles unit: bundle the entry stylesheet with lightningcss.
//!
//! `@import`s are inlined into one file. Output is prefixed for the
//! supported browser matrix, minified in production, and always gets a
//! source map next to the other units' maps.

use anyhow::{Result, anyhow};
use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;

use crate::config::PipelineConfig;
use crate::core::{AssetCategory, BuildMode};
use crate::debug;
use crate::logger::ProgressLine;
use crate::utils::path::display_rel;

/// Encode a browser version the way lightningcss expects.
const fn v(major: u32, minor: u32) -> Option<u32> {
    Some(major << 16 | minor << 8)
}

/// Browser support matrix of the served pages, drives vendor prefixing.
fn browser_targets() -> Targets {
    Targets::from(Browsers {
        ie: v(11, 0),
        edge: v(15, 0),
        firefox: v(52, 0),
        chrome: v(55, 0),
        safari: v(9, 1),
        ios_saf: v(9, 3),
        ..Browsers::default()
    })
}

/// Bundle and print the entry stylesheet.
///
/// Returns the number of files written (the bundle and its map).
pub fn build(
    config: &PipelineConfig,
    mode: BuildMode,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let entry = config.styles_entry();
    if !entry.is_file() {
        return Err(anyhow!("entry stylesheet '{}' not found", entry.display()));
    }

    let sources = FileProvider::new();
    let mut bundler = Bundler::new(&sources, None, ParserOptions::default());
    let stylesheet = bundler
        .bundle(&entry)
        .map_err(|e| anyhow!("failed to bundle {}: {e}", entry.display()))?;

    let mut source_map = SourceMap::new("/");
    let css = stylesheet
        .to_css(PrinterOptions {
            minify: mode.minify,
            source_map: Some(&mut source_map),
            targets: browser_targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("failed to print {}: {e}", entry.display()))?;

    let out_path = config
        .paths
        .output_dir(AssetCategory::Styles)
        .join(&config.styles.entry);
    let map_path = super::map_dest(&config.paths.maps_dir(), &config.styles.entry);

    let mut code = css.code;
    code.push_str(&format!(
        "\n/*# sourceMappingURL={} */\n",
        super::map_url(&config.paths.maps, &config.styles.entry)
    ));
    let map_json = source_map.to_json(None).map_err(|e| anyhow!("{e}"))?;

    super::write_output(&out_path, code.as_bytes())?;
    super::write_output(&map_path, map_json.as_bytes())?;

    if let Some(p) = progress {
        p.inc("styles");
    }
    debug!("styles"; "bundled {}", display_rel(&out_path, config.get_root()));

    Ok(2)
}
