//! C/C++ include solver.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::resolver::PathResolver;
use super::{compile_pattern, extension_file_pattern, validate_extensions, Solver};
use crate::config::SolverOptions;
use crate::error::Result;
use crate::graph::GraphStore;

const NAME: &str = "c";

const DEFAULT_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "c++", "hh", "hpp", "hxx", "inl"];

/// Statement patterns, indexed by [`IncludeForm`].
static STATEMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"^[ \t]*#[ \t]*include[ \t]*"([^"]+)""#).unwrap(),
        Regex::new(r"^[ \t]*#[ \t]*include[ \t]*<([^>]+)>").unwrap(),
    ]
});

static DEFAULT_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    Regex::new(&extension_file_pattern(r"[^/\\]+", &extensions)).unwrap()
});

/// Include form of a matched statement, by pattern index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeForm {
    /// `#include "file.h"`: relative to the including file, then search paths.
    Quoted,
    /// `#include <file.h>`: search paths only.
    System,
}

impl IncludeForm {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Quoted),
            1 => Some(Self::System),
            _ => None,
        }
    }
}

pub struct CFamilySolver {
    file_pattern: Regex,
    resolver: PathResolver,
}

impl Default for CFamilySolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CFamilySolver {
    pub fn new() -> Self {
        Self {
            file_pattern: DEFAULT_FILE_PATTERN.clone(),
            // Includes name the file verbatim; no extension probing.
            resolver: PathResolver::new(&[]),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }
}

impl Solver for CFamilySolver {
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
                compile_pattern(NAME, &extension_file_pattern(r"[^/\\]+", &extensions))?;
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

        let Some(form) = IncludeForm::from_index(pattern_index) else {
            log::warn!("c: no include form for pattern index {pattern_index}");
            return 0;
        };

        let statement = statement.trim();
        let candidate = Path::new(statement);
        let resolution = match form {
            IncludeForm::Quoted => {
                let importing_dir = source.parent().unwrap_or(Path::new(""));
                self.resolver.resolve(importing_dir, candidate, statement)
            }
            IncludeForm::System => self.resolver.resolve_in_search_paths(candidate, statement),
        };

        usize::from(self.commit_edge(
            store,
            source,
            resolution.destination(),
            resolution.name(),
            line_no,
        ))
    }
}
