//! Solver trait and registry.

use std::path::Path;

use regex::Regex;

use crate::config::{ScanConfig, SolverOptions};
use crate::error::{Result, TrellisError};
use crate::graph::GraphStore;

pub mod c_family;
pub mod python;
pub mod resolver;

pub use resolver::{PathResolver, Resolution};

/// Trait that all language solvers implement.
///
/// A solver is configured once, before scanning, and then shared immutably
/// across scan workers.
pub trait Solver: Send + Sync {
    /// Solver name used in configuration and language filters (e.g. "python").
    fn name(&self) -> &str;

    /// Statement patterns in dispatch order. A pattern's position is the
    /// `pattern_index` passed to [`Solver::handle_match`]; reordering them
    /// changes which grammar branch handles a match.
    fn statement_patterns(&self) -> &[Regex];

    /// Pattern matched against a file path to route the file to this solver.
    fn file_pattern(&self) -> &Regex;

    /// Apply search directories, extensions and pattern overrides.
    fn configure(&mut self, options: &SolverOptions) -> Result<()>;

    /// Handle one statement match: reject unsupported forms, split compound
    /// statements, resolve each target and commit its edge. `statement` is the
    /// pattern's first capture group. Returns the number of edges committed.
    fn handle_match(
        &self,
        store: &GraphStore,
        source: &Path,
        statement: &str,
        pattern_index: usize,
        line_no: usize,
    ) -> usize;

    /// Commit one edge into the shared store.
    fn commit_edge(
        &self,
        store: &GraphStore,
        source: &Path,
        destination: Option<&Path>,
        name: &str,
        line_no: usize,
    ) -> bool {
        store.commit_edge(source, destination, name, line_no)
    }

    /// Whether this solver handles the given file.
    fn handles(&self, path: &Path) -> bool {
        self.file_pattern().is_match(&path.to_string_lossy())
    }
}

/// Compile a pattern, attributing failures to the solver.
pub(crate) fn compile_pattern(solver: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| TrellisError::InvalidPattern {
        solver: solver.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Validate a configured extension list (`py`, `hpp`, ...; no dots).
pub(crate) fn validate_extensions(solver: &str, extensions: &[String]) -> Result<Vec<String>> {
    if extensions.is_empty() {
        return Err(TrellisError::Config(format!(
            "solver '{solver}': extension list is empty"
        )));
    }
    extensions
        .iter()
        .map(|ext| {
            let valid = !ext.is_empty()
                && ext
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
            if valid {
                Ok(ext.clone())
            } else {
                Err(TrellisError::InvalidExtension {
                    solver: solver.to_string(),
                    extension: ext.clone(),
                })
            }
        })
        .collect()
}

/// Build a file-routing pattern from a stem pattern and an extension list.
pub(crate) fn extension_file_pattern(stem: &str, extensions: &[String]) -> String {
    let alternatives: Vec<String> = extensions.iter().map(|e| regex::escape(e)).collect();
    format!(r"^(?:.*[/\\])?{stem}\.(?:{})$", alternatives.join("|"))
}

/// Registry of configured solvers, consulted in order.
pub struct SolverRegistry {
    solvers: Vec<Box<dyn Solver>>,
}

impl SolverRegistry {
    /// Build the registry with every solver in its default configuration.
    pub fn new() -> Self {
        Self {
            solvers: default_solvers(),
        }
    }

    /// Build, configure and filter the solvers for a scan.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        let mut solvers = default_solvers();

        for name in config.solvers.keys() {
            if !solvers.iter().any(|s| s.name().eq_ignore_ascii_case(name)) {
                return Err(TrellisError::UnknownLanguage(name.clone()));
            }
        }
        if let Some(filter) = &config.languages {
            for name in filter {
                if !solvers.iter().any(|s| s.name().eq_ignore_ascii_case(name)) {
                    return Err(TrellisError::UnknownLanguage(name.clone()));
                }
            }
        }

        solvers.retain(|s| config.language_enabled(s.name()));
        for solver in &mut solvers {
            let options = config.solver_options(solver.name());
            solver.configure(&options)?;
        }

        Ok(Self { solvers })
    }

    /// First solver whose file pattern matches `path`.
    pub fn solver_for(&self, path: &Path) -> Option<&dyn Solver> {
        self.solvers
            .iter()
            .find(|s| s.handles(path))
            .map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.solvers.iter().map(|s| s.name()).collect()
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_solvers() -> Vec<Box<dyn Solver>> {
    vec![
        Box::new(c_family::CFamilySolver::new()),
        Box::new(python::PythonSolver::new()),
    ]
}
