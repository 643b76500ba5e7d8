//! Scripts unit: parse, down-level and emit the entry script with oxc.
//!
//! Development builds only down-level to the configured syntax target and
//! keep readable output. Production builds additionally verify every
//! global reference against the externs surface, minify with name
//! mangling, and wrap the result so nothing leaks into page scope.
//!
//! Vendor scripts listed in the config are copied verbatim, never parsed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::{Scoping, SemanticBuilder};
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};

use super::copy::{CopyJob, copy_job};
use crate::config::PipelineConfig;
use crate::core::{AssetCategory, BuildMode};
use crate::debug;
use crate::externs::ExternsSet;
use crate::identity::is_platform_builtin;
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::path::display_rel;
use crate::utils::plural_s;

/// Compile the entry script and copy vendor scripts.
///
/// Returns the number of files written.
pub fn build(
    config: &PipelineConfig,
    mode: BuildMode,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let input_dir = config.paths.input_dir(AssetCategory::Scripts);
    let entry = config.scripts_entry();
    if !entry.is_file() {
        return Err(anyhow!("entry script '{}' not found", entry.display()));
    }

    // Externs are only consulted when globals get verified
    let externs = if mode.verify_globals {
        Some(ExternsSet::discover(config.externs_dir())?)
    } else {
        None
    };

    let source = fs::read_to_string(&entry)
        .with_context(|| format!("Failed to read {}", entry.display()))?;
    let compiled = compile(&source, &entry, &config.scripts.target, mode, externs.as_ref())?;

    let out_path = config
        .paths
        .output_dir(AssetCategory::Scripts)
        .join(&config.scripts.entry);
    let map_path = super::map_dest(&config.paths.maps_dir(), &config.scripts.entry);

    let mut code = compiled.code;
    code.push_str(&format!(
        "\n//# sourceMappingURL={}\n",
        super::map_url(&config.paths.maps, &config.scripts.entry)
    ));

    super::write_output(&out_path, code.as_bytes())?;
    super::write_output(&map_path, compiled.map_json.as_bytes())?;

    if let Some(p) = progress {
        p.inc("scripts");
    }
    debug!("scripts"; "compiled {}", display_rel(&out_path, config.get_root()));

    // Vendor scripts ride along untouched
    let mut files = 2;
    for rel in &config.scripts.vendor {
        let job = CopyJob {
            source: input_dir.join(rel),
            dest: config.paths.output_dir(AssetCategory::Scripts).join(rel),
        };
        if !job.source.is_file() {
            log!("warning"; "vendor script not found: {}", job.source.display());
            continue;
        }
        if copy_job(&job, config.clean)? {
            files += 1;
        }
        if let Some(p) = progress {
            p.inc("scripts");
        }
    }

    Ok(files)
}

struct Compiled {
    code: String,
    map_json: String,
}

fn compile(
    source: &str,
    entry: &Path,
    target: &str,
    mode: BuildMode,
    externs: Option<&ExternsSet>,
) -> Result<Compiled> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    ensure_no_diagnostics("failed to parse", entry, &ret.errors)?;
    let mut program = ret.program;

    let semantic = SemanticBuilder::new().build(&program);
    // Semantic diagnostics (shadowing, redeclarations) are advisory
    for warning in &semantic.errors {
        debug!("scripts"; "{}: {}", entry.display(), warning);
    }
    let scoping = semantic.semantic.into_scoping();

    // Verify before down-leveling: the transformer introduces helper
    // references that would show up as false positives.
    if let Some(externs) = externs {
        verify_globals(&scoping, externs, entry)?;
    }

    let options = TransformOptions::from_target(target)
        .map_err(|e| anyhow!("invalid scripts.target '{target}': {e}"))?;
    let transformed =
        Transformer::new(&allocator, entry, &options).build_with_scoping(scoping, &mut program);
    ensure_no_diagnostics("failed to transform", entry, &transformed.errors)?;

    let scoping = if mode.minify {
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        Minifier::new(options).minify(&allocator, &mut program).scoping
    } else {
        None
    };

    let ret = Codegen::new()
        .with_options(CodegenOptions {
            minify: mode.minify,
            comments: if mode.minify {
                CommentOptions::disabled()
            } else {
                CommentOptions::default()
            },
            source_map_path: Some(entry.to_path_buf()),
            ..CodegenOptions::default()
        })
        .with_scoping(scoping)
        .build(&program);

    let map = ret
        .map
        .ok_or_else(|| anyhow!("no source map emitted for {}", entry.display()))?;

    let mut code = ret.code;
    let mut map_json = map.to_json_string();
    if mode.minify {
        code = wrap_page_scope(&code);
        map_json = shift_map_line(&map_json)?;
    }

    Ok(Compiled { code, map_json })
}

/// Reject references to globals declared neither by the platform nor by
/// any externs file. The mangler would rename them and the page would
/// break at runtime.
fn verify_globals(scoping: &Scoping, externs: &ExternsSet, entry: &Path) -> Result<()> {
    let mut undeclared: Vec<String> = scoping
        .root_unresolved_references()
        .iter()
        .map(|(name, _)| name.to_string())
        .filter(|name| !is_platform_builtin(name) && !externs.contains(name))
        .collect();

    if undeclared.is_empty() {
        return Ok(());
    }
    undeclared.sort_unstable();
    undeclared.dedup();

    let consulted = if externs.is_empty() {
        String::from("none")
    } else {
        externs
            .files()
            .iter()
            .map(|p| {
                p.file_name()
                    .unwrap_or(p.as_os_str())
                    .to_string_lossy()
                    .into_owned()
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    Err(anyhow!(
        "undeclared global{} in {}: {} (externs consulted: {})",
        plural_s(undeclared.len()),
        entry.display(),
        undeclared.join(", "),
        consulted
    ))
}

fn ensure_no_diagnostics(
    stage: &str,
    entry: &Path,
    errors: &[impl std::fmt::Display],
) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .iter()
        .take(5)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    Err(anyhow!("{stage} {}:\n{details}", entry.display()))
}

/// Wrap compiled output so top-level bindings stay out of page scope.
/// `this` inside still refers to the page global object.
fn wrap_page_scope(code: &str) -> String {
    format!("(function(){{\n{}\n}}).call(this);", code.trim_end())
}

/// The page-scope wrapper pushes the generated code down one line, shift
/// the map's generated positions to match.
fn shift_map_line(map_json: &str) -> Result<String> {
    let mut map: serde_json::Value = serde_json::from_str(map_json)?;
    if let Some(serde_json::Value::String(mappings)) = map.get_mut("mappings") {
        mappings.insert(0, ';');
    }
    Ok(serde_json::to_string(&map)?)
}
