//! Walk the scan root and collect the files a solver claims.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::error::{Result, TrellisError};
use crate::solvers::SolverRegistry;

/// Directory names never descended into.
const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".eggs",
    ".venv",
    "venv",
    "target",
];

/// Discover scannable files under `config.root`.
///
/// Returns canonical absolute paths, sorted, so vertex keys of scanned files
/// agree with canonicalised resolution results.
pub fn discover_files(config: &ScanConfig, registry: &SolverRegistry) -> Result<Vec<PathBuf>> {
    let root = std::fs::canonicalize(&config.root).map_err(|e| {
        TrellisError::Config(format!("scan root {}: {e}", config.root.display()))
    })?;

    let exclude_patterns: Vec<&str> = DEFAULT_EXCLUDES
        .iter()
        .copied()
        .chain(config.exclude_patterns.iter().map(|s| s.as_str()))
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && exclude_patterns.iter().any(|p| name == *p) {
                return false;
            }
            !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::debug!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !claimed(entry.path(), registry) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > config.max_file_size {
            log::debug!("skipping {} ({size} bytes)", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    log::info!("discovered {} files under {}", files.len(), root.display());
    Ok(files)
}

fn claimed(path: &Path, registry: &SolverRegistry) -> bool {
    registry.solver_for(path).is_some()
}
