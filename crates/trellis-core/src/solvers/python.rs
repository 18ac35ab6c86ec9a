//! Python import solver.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::resolver::PathResolver;
use super::{compile_pattern, extension_file_pattern, validate_extensions, Solver};
use crate::config::SolverOptions;
use crate::error::Result;
use crate::graph::GraphStore;

const NAME: &str = "python";

/// Default probe extensions for module-to-file resolution.
const DEFAULT_EXTENSIONS: &[&str] = &["py"];

/// Statement patterns, indexed by [`ImportForm`].
static STATEMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // import a.b [as c], d
        Regex::new(
            r"^[ \t]*import[ \t]+([^\d\W][\w.]*(?:[ \t]+as[ \t]+[^\d\W]\w*)?(?:[ \t]*,[ \t]*[^\d\W][\w.]*(?:[ \t]+as[ \t]+[^\d\W]\w*)?)*)[ \t]*(?:#.*)?$",
        )
        .unwrap(),
        // from a.b import c [as d], e | *
        Regex::new(
            r"^[ \t]*from[ \t]+([^\d\W][\w.]*[ \t]+import[ \t]+(?:\*|[^\d\W][\w,. \t]*))(?:#.*)?$",
        )
        .unwrap(),
    ]
});

static DEFAULT_FILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:.*[/\\])?[^\d\W]\w*\.py[3w]?$").unwrap());

/// Grammar form of a matched statement, by pattern index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportForm {
    /// `import a.b, c`
    Plain,
    /// `from a.b import c, d`
    Qualified,
}

impl ImportForm {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Plain),
            1 => Some(Self::Qualified),
            _ => None,
        }
    }
}

/// One import target after decomposition: aliases dropped, already split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleImport {
    /// Module part of a `from` import.
    pub module: Option<String>,
    pub target: String,
}

impl SingleImport {
    /// Dotted name, used as the raw reference name. `from pkg import a` is
    /// normalised to `pkg.a` rather than kept as the statement text, so both
    /// import forms name the same module identically.
    pub fn dotted(&self) -> String {
        match &self.module {
            Some(module) => format!("{module}.{}", self.target),
            None => self.target.clone(),
        }
    }

    /// Relative path candidate: dots become host path separators.
    pub fn candidate(&self) -> PathBuf {
        let mut path = PathBuf::new();
        let module_parts = self.module.iter().flat_map(|m| m.split('.'));
        for part in module_parts.chain(self.target.split('.')) {
            if !part.is_empty() {
                path.push(part);
            }
        }
        path
    }
}

/// Drop an `as <alias>` clause from one target.
fn strip_alias(target: &str) -> Option<&str> {
    target.split_whitespace().next()
}

/// Split a matched statement into its single-target imports.
///
/// Wildcard statements are rejected before this point; a malformed `from`
/// clause yields nothing.
pub fn decompose(form: ImportForm, statement: &str) -> Vec<SingleImport> {
    match form {
        ImportForm::Plain => statement
            .split(',')
            .filter_map(strip_alias)
            .map(|target| SingleImport {
                module: None,
                target: target.to_string(),
            })
            .collect(),
        ImportForm::Qualified => {
            let Some((module, rest)) = statement.trim().split_once(char::is_whitespace) else {
                return Vec::new();
            };
            let Some(names) = rest.trim_start().strip_prefix("import") else {
                return Vec::new();
            };
            names
                .split(',')
                .filter_map(strip_alias)
                .map(|target| SingleImport {
                    module: Some(module.to_string()),
                    target: target.to_string(),
                })
                .collect()
        }
    }
}

pub struct PythonSolver {
    file_pattern: Regex,
    resolver: PathResolver,
}

impl Default for PythonSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PythonSolver {
    pub fn new() -> Self {
        Self {
            file_pattern: DEFAULT_FILE_PATTERN.clone(),
            resolver: PathResolver::new(DEFAULT_EXTENSIONS).with_package_marker("__init__.py"),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }
}

impl Solver for PythonSolver {
    fn name(&self) -> &str {
        NAME
    }

    fn statement_patterns(&self) -> &[Regex] {
        &STATEMENT_PATTERNS
    }

    fn file_pattern(&self) -> &Regex {
        &self.file_pattern
    }

    fn configure(&mut self, options: &SolverOptions) -> Result<()> {
        self.resolver.add_include_paths(&options.include_paths);
        if let Some(extensions) = &options.extensions {
            let extensions = validate_extensions(NAME, extensions)?;
            self.file_pattern =
                compile_pattern(NAME, &extension_file_pattern(r"[^\d\W]\w*", &extensions))?;
            self.resolver.set_extensions(extensions);
        }
        if let Some(pattern) = &options.file_pattern {
            self.file_pattern = compile_pattern(NAME, pattern)?;
        }
        Ok(())
    }

    fn handle_match(
        &self,
        store: &GraphStore,
        source: &Path,
        statement: &str,
        pattern_index: usize,
        line_no: usize,
    ) -> usize {
        log::trace!(
            "handle_match: {} -> {statement}, idx = {pattern_index}, line_no = {line_no}",
            source.display()
        );

        if statement.contains('*') {
            log::trace!("wildcard import skipped: {statement}");
            return 0;
        }

        let Some(form) = ImportForm::from_index(pattern_index) else {
            log::warn!("python: no grammar form for pattern index {pattern_index}");
            return 0;
        };

        let importing_dir = source.parent().unwrap_or(Path::new(""));
        let mut committed = 0;
        for single in decompose(form, statement) {
            let resolution =
                self.resolver
                    .resolve(importing_dir, &single.candidate(), &single.dotted());
            if self.commit_edge(
                store,
                source,
                resolution.destination(),
                resolution.name(),
                line_no,
            ) {
                committed += 1;
            }
        }
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn capture(index: usize, line: &str) -> Option<String> {
        STATEMENT_PATTERNS[index]
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    #[test]
    fn plain_import_patterns() {
        assert_eq!(capture(0, "import os"), Some("os".to_string()));
        assert_eq!(capture(0, "  import os.path"), Some("os.path".to_string()));
        assert_eq!(capture(0, "import a, b.c"), Some("a, b.c".to_string()));
        assert_eq!(capture(0, "import numpy as np"), Some("numpy as np".to_string()));
        assert_eq!(capture(0, "import os  # comment"), Some("os".to_string()));
        assert_eq!(capture(0, "import 3d"), None);
        assert_eq!(capture(0, "# import os"), None);
        assert_eq!(capture(0, "imports = 3"), None);
    }

    #[test]
    fn from_import_patterns() {
        assert_eq!(
            capture(1, "from pkg.sub import mod"),
            Some("pkg.sub import mod".to_string())
        );
        assert_eq!(capture(1, "from x import *"), Some("x import *".to_string()));
        assert_eq!(capture(1, "from x import a, b as c"), Some("x import a, b as c".to_string()));
        assert_eq!(capture(1, "from . import a"), None);
        assert_eq!(capture(0, "from x import a"), None);
    }

    #[test]
    fn decompose_plain_drops_aliases() {
        let singles = decompose(ImportForm::Plain, "foo as bar, a.b,c");
        let targets: Vec<_> = singles.iter().map(|s| s.target.as_str()).collect();
        assert_eq!(targets, vec!["foo", "a.b", "c"]);
        assert!(singles.iter().all(|s| s.module.is_none()));
    }

    #[test]
    fn decompose_qualified() {
        let singles = decompose(ImportForm::Qualified, "pkg.sub import a, b as c ");
        assert_eq!(
            singles,
            vec![
                SingleImport {
                    module: Some("pkg.sub".to_string()),
                    target: "a".to_string()
                },
                SingleImport {
                    module: Some("pkg.sub".to_string()),
                    target: "b".to_string()
                },
            ]
        );
    }

    #[test]
    fn decompose_malformed_qualified_is_empty() {
        assert!(decompose(ImportForm::Qualified, "pkg").is_empty());
        assert!(decompose(ImportForm::Qualified, "pkg export a").is_empty());
    }

    #[test]
    fn candidate_uses_path_components() {
        let single = SingleImport {
            module: Some("pkg.sub".to_string()),
            target: "mod".to_string(),
        };
        assert_eq!(single.candidate(), Path::new("pkg").join("sub").join("mod"));
        assert_eq!(single.dotted(), "pkg.sub.mod");
    }

    #[test]
    fn unknown_index_produces_nothing() {
        let store = GraphStore::new();
        let solver = PythonSolver::new();
        assert_eq!(solver.handle_match(&store, Path::new("/r/a.py"), "os", 7, 1), 0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn file_pattern_matches_python_files() {
        let solver = PythonSolver::new();
        assert!(solver.handles(Path::new("/repo/pkg/mod.py")));
        assert!(solver.handles(Path::new("tool.pyw")));
        assert!(solver.handles(Path::new("legacy.py3")));
        assert!(!solver.handles(Path::new("/repo/1bad.py")));
        assert!(!solver.handles(Path::new("/repo/notes.pyc")));
    }

    #[test]
    fn configured_extensions_change_routing() {
        let mut solver = PythonSolver::new();
        solver
            .configure(&SolverOptions {
                extensions: Some(vec!["py".to_string(), "pyi".to_string()]),
                ..Default::default()
            })
            .unwrap();
        assert!(solver.handles(Path::new("stubs.pyi")));
        assert!(!solver.handles(Path::new("tool.pyw")));
        assert_eq!(solver.resolver().extensions(), ["py", "pyi"]);
    }
}
