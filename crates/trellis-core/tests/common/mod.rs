//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use trellis_core::config::{ScanConfig, SolverOptions};
use trellis_core::graph::{DependencyGraph, EdgeInfo};
use trellis_core::pipeline::{run_scan, ScanOutcome};

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

/// Canonical key of a file inside a fixture or temp tree.
pub fn key_of(root: &Path, rel: &str) -> String {
    root.join(rel)
        .canonicalize()
        .unwrap_or_else(|_| panic!("missing fixture file {rel}"))
        .to_string_lossy()
        .to_string()
}

// ---------------------------------------------------------------------------
// Temp trees
// ---------------------------------------------------------------------------

/// Write `files` under a fresh temp dir. The returned root is canonical.
pub fn temp_tree(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::TempDir::new().expect("create temp dir");
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

// ---------------------------------------------------------------------------
// Scan runners
// ---------------------------------------------------------------------------

pub fn config_for(root: &Path) -> ScanConfig {
    ScanConfig {
        root: root.to_path_buf(),
        ..Default::default()
    }
}

/// Run a full scan over a directory.
pub fn scan_dir(root: &Path) -> ScanOutcome {
    run_scan(&config_for(root), None).expect("scan should succeed")
}

/// Run a full scan with search directories for one solver.
pub fn scan_dir_with(root: &Path, solver: &str, include_paths: Vec<PathBuf>) -> ScanOutcome {
    let mut config = config_for(root);
    config.solvers.insert(
        solver.to_string(),
        SolverOptions {
            include_paths,
            ..Default::default()
        },
    );
    run_scan(&config, None).expect("scan should succeed")
}

// ---------------------------------------------------------------------------
// Extractors from DependencyGraph
// ---------------------------------------------------------------------------

/// Outgoing edges of a file, given relative to `root`.
pub fn edges_of(graph: &DependencyGraph, root: &Path, rel: &str) -> Vec<EdgeInfo> {
    graph.edges_from(&key_of(root, rel))
}

/// (target, line) pairs of a file's edges, with resolved targets made
/// relative to `root`.
pub fn targets_of(graph: &DependencyGraph, root: &Path, rel: &str) -> Vec<(String, usize)> {
    edges_of(graph, root, rel)
        .into_iter()
        .map(|e| {
            let target = Path::new(&e.target)
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or(e.target.clone());
            (target, e.line_no)
        })
        .collect()
}

/// Expected (target, line) list.
pub fn expected(pairs: &[(&str, usize)]) -> Vec<(String, usize)> {
    pairs.iter().map(|(t, l)| (t.to_string(), *l)).collect()
}
