//! Externs discovery for production script verification.
//!
//! Externs files describe globals that exist at runtime but are not part of
//! the compiled sources, such as the Google platform library loaded from a
//! `<script>` tag. Production builds refuse to emit code that references a
//! global declared neither here nor by the browser platform.
//!
//! Only top-level declarations count as externs: `var`, `function` and
//! `class` statements. Property assignments like `window.gapi = gapi` are
//! expression statements and declare nothing.

use anyhow::{Context, Result, anyhow};
use oxc::allocator::Allocator;
use oxc::ast::ast::Statement;
use oxc::parser::Parser;
use oxc::span::SourceType;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// The set of global names declared by all externs files in a directory.
#[derive(Debug, Default)]
pub struct ExternsSet {
    /// Externs files in lexicographic order, for diagnostics
    files: Vec<PathBuf>,
    /// Union of top-level names declared across all files
    names: FxHashSet<String>,
}

impl ExternsSet {
    /// Read every `.js` file in `dir` and collect its top-level declarations.
    ///
    /// Files are processed in lexicographic filename order. A missing
    /// directory is an error: production builds must not silently run
    /// without their externs.
    pub fn discover(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir)
            .map_err(|_| anyhow!("externs directory '{}' not found", dir.display()))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "js"))
            .collect();
        paths.sort();

        let mut set = Self::default();
        for path in paths {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read externs file '{}'", path.display()))?;
            set.add_source(path, &source)?;
        }
        Ok(set)
    }

    /// Parse one externs source and merge its declarations.
    pub fn add_source(&mut self, path: PathBuf, source: &str) -> Result<()> {
        let declared = declared_names(&path, source)?;
        self.names.extend(declared);
        self.files.push(path);
        Ok(())
    }

    /// Whether `name` is declared by any externs file.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// The externs files that were consulted, in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collect the top-level binding names of an externs source.
fn declared_names(path: &Path, source: &str) -> Result<Vec<String>> {
    let allocator = Allocator::default();
    // Externs are plain scripts, not modules
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();

    if !ret.errors.is_empty() {
        let first = &ret.errors[0];
        return Err(anyhow!(
            "Failed to parse externs file '{}': {first}",
            path.display()
        ));
    }

    let mut names = Vec::new();
    for stmt in &ret.program.body {
        match stmt {
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let Some(ident) = declarator.id.get_binding_identifier() {
                        names.push(ident.name.to_string());
                    }
                }
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    names.push(id.name.to_string());
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    names.push(id.name.to_string());
                }
            }
            _ => {}
        }
    }
    Ok(names)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const GAPI_EXTERNS: &str = r#"
var gapi = {};
gapi.auth2 = {};
gapi.auth2.getAuthInstance = function() {};
window.gapi = gapi;
"#;

    #[test]
    fn test_declared_names_only_counts_bindings() {
        let names = declared_names(Path::new("gapi.js"), GAPI_EXTERNS).unwrap();
        // Property assignments declare nothing, only `var gapi` counts
        assert_eq!(names, vec!["gapi".to_string()]);
    }

    #[test]
    fn test_declared_names_var_function_class() {
        let source = "var ga;\nfunction analytics() {}\nclass Widget {}\nga = 1;";
        let names = declared_names(Path::new("x.js"), source).unwrap();
        assert_eq!(names, vec!["ga", "analytics", "Widget"]);
    }

    #[test]
    fn test_declared_names_parse_error() {
        let err = declared_names(Path::new("bad.js"), "var = ;").unwrap_err();
        assert!(err.to_string().contains("bad.js"));
    }

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.js"), "var beta;").unwrap();
        fs::write(dir.path().join("a.js"), "var alpha;").unwrap();
        fs::write(dir.path().join("notes.txt"), "not an externs file").unwrap();

        let set = ExternsSet::discover(dir.path()).unwrap();

        let file_names: Vec<_> = set
            .files()
            .iter()
            .filter_map(|p| p.file_name())
            .collect();
        assert_eq!(file_names, vec!["a.js", "b.js"]);
        assert!(set.contains("alpha"));
        assert!(set.contains("beta"));
        assert!(!set.contains("notes"));
    }

    #[test]
    fn test_discover_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("closureexterns");

        let err = ExternsSet::discover(&missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_set() {
        let set = ExternsSet::default();
        assert!(set.is_empty());
        assert!(!set.contains("gapi"));
    }
}
