//! Line-oriented statement scanning, fanned out over files with rayon.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Result, TrellisError};
use crate::graph::{DependencyGraph, GraphStore};
use crate::solvers::SolverRegistry;

/// Per-file scan counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileScan {
    pub statements: usize,
    pub edges: usize,
}

/// A file that contributed no edges because it could not be read.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: TrellisError,
}

/// Aggregate result of scanning a set of files.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files_scanned: usize,
    pub statements_matched: usize,
    pub edges_committed: usize,
    pub failures: Vec<FileFailure>,
}

/// Routes files to solvers and feeds every statement match into the shared
/// graph store.
pub struct Scanner {
    registry: SolverRegistry,
    store: GraphStore,
}

impl Scanner {
    pub fn new(registry: SolverRegistry) -> Self {
        Self {
            registry,
            store: GraphStore::new(),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Scan already-loaded content. Files no solver claims are ignored.
    pub fn scan_source(&self, path: &Path, content: &str) -> FileScan {
        let mut scan = FileScan::default();
        let Some(solver) = self.registry.solver_for(path) else {
            return scan;
        };
        log::debug!("scanning {} with {}", path.display(), solver.name());
        self.store.add_file(path);

        for (i, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            for (pattern_index, pattern) in solver.statement_patterns().iter().enumerate() {
                let Some(caps) = pattern.captures(line) else {
                    continue;
                };
                let Some(statement) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                scan.statements += 1;
                scan.edges += solver.handle_match(
                    &self.store,
                    path,
                    statement.as_str(),
                    pattern_index,
                    i + 1,
                );
            }
        }
        scan
    }

    /// Read and scan one file.
    pub fn scan_file(&self, path: &Path) -> Result<FileScan> {
        if self.registry.solver_for(path).is_none() {
            return Ok(FileScan::default());
        }
        let bytes = std::fs::read(path).map_err(|source| TrellisError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.scan_source(path, &String::from_utf8_lossy(&bytes)))
    }

    /// Scan files in parallel. Unreadable files are reported and skipped.
    ///
    /// `threads` sizes a dedicated pool; `None` uses rayon's global pool.
    pub fn scan_files(&self, paths: &[PathBuf], threads: Option<usize>) -> ScanReport {
        let run = || -> Vec<(PathBuf, Result<FileScan>)> {
            paths
                .par_iter()
                .map(|path| (path.clone(), self.scan_file(path)))
                .collect()
        };

        let results = match threads {
            Some(n) => match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                Ok(pool) => pool.install(run),
                Err(e) => {
                    log::warn!("could not build a {n}-thread pool ({e}), using the global pool");
                    run()
                }
            },
            None => run(),
        };

        let mut report = ScanReport::default();
        for (path, result) in results {
            match result {
                Ok(scan) => {
                    report.files_scanned += 1;
                    report.statements_matched += scan.statements;
                    report.edges_committed += scan.edges;
                }
                Err(error) => {
                    log::warn!("{error}");
                    report.failures.push(FileFailure { path, error });
                }
            }
        }
        report
    }

    /// Finish scanning and hand the graph over.
    pub fn into_graph(self) -> DependencyGraph {
        self.store.into_graph()
    }
}
