//! Core data types and configuration for a Trellis scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrellisError};

/// Options handed to a solver's `configure` before scanning starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Search directories, appended in order to the solver's list.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Replaces the solver's recognized extensions when set.
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    /// Replaces the solver's file-routing pattern when set.
    #[serde(default)]
    pub file_pattern: Option<String>,
}

impl SolverOptions {
    pub fn with_include_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            include_paths: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Configuration for a scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub root: PathBuf,
    pub output_path: Option<PathBuf>,
    /// Restrict scanning to these solvers (by name, case-insensitive).
    pub languages: Option<Vec<String>>,
    /// Per-solver options keyed by solver name.
    #[serde(default)]
    pub solvers: HashMap<String, SolverOptions>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Worker count; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub quiet: bool,
}

fn default_max_file_size() -> u64 {
    1_000_000
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            output_path: None,
            languages: None,
            solvers: HashMap::new(),
            exclude_patterns: Vec::new(),
            max_file_size: default_max_file_size(),
            threads: None,
            verbose: false,
            quiet: false,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrellisError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| TrellisError::Config(format!("{}: {e}", path.display())))
    }

    /// Options for the named solver, or the defaults.
    pub fn solver_options(&self, solver: &str) -> SolverOptions {
        self.solvers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(solver))
            .map(|(_, opts)| opts.clone())
            .unwrap_or_default()
    }

    /// Whether the language filter (if any) admits this solver.
    pub fn language_enabled(&self, solver: &str) -> bool {
        match &self.languages {
            Some(filter) => filter.iter().any(|f| f.eq_ignore_ascii_case(solver)),
            None => true,
        }
    }
}

/// Counters gathered while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files: usize,
    pub failed_files: usize,
    pub statements: usize,
    pub vertices: usize,
    pub edges: usize,
    pub unresolved: usize,
}

/// Result document written by the output layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphOutput {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub stats: ScanStats,
    #[serde(default)]
    pub vertices: Vec<VertexOutput>,
    #[serde(default)]
    pub edges: Vec<EdgeOutput>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for GraphOutput {
    fn default() -> Self {
        Self {
            version: default_version(),
            metadata: HashMap::new(),
            stats: ScanStats::default(),
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

/// Vertex in the output JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexOutput {
    pub key: String,
    pub label: String,
    pub resolved: bool,
}

/// Edge in the output JSON. `destination` is empty for unresolved references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeOutput {
    pub from: String,
    pub to: String,
    pub destination: String,
    pub name: String,
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_config_defaults() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.max_file_size, 1_000_000);
        assert!(cfg.threads.is_none());
        assert!(cfg.solvers.is_empty());
        assert!(cfg.language_enabled("python"));
    }

    #[test]
    fn language_filter_is_case_insensitive() {
        let cfg = ScanConfig {
            languages: Some(vec!["Python".to_string()]),
            ..Default::default()
        };
        assert!(cfg.language_enabled("python"));
        assert!(!cfg.language_enabled("c"));
    }

    #[test]
    fn solver_options_deserialize_with_defaults() {
        let json = r#"{
            "root": "/repo",
            "solvers": { "c": { "include_paths": ["/usr/include"] } }
        }"#;
        let cfg: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.max_file_size, 1_000_000);
        let c = cfg.solver_options("C");
        assert_eq!(c.include_paths, vec![PathBuf::from("/usr/include")]);
        assert!(c.extensions.is_none());
        assert_eq!(cfg.solver_options("python"), SolverOptions::default());
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = ScanConfig::from_json_file(Path::new("/nonexistent/trellis.json")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn graph_output_default() {
        let out = GraphOutput::default();
        assert_eq!(out.version, "1.0");
        assert!(out.edges.is_empty());
    }
}
