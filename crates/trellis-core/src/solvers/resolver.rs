//! Statement-to-path resolution shared by all solvers.
//!
//! A candidate is first probed relative to the importing file's directory,
//! then against each configured search directory in order. Any hit is
//! canonicalised before it becomes a vertex key; a miss is an unresolved
//! reference, which is a valid outcome rather than an error.

use std::path::{Path, PathBuf};

/// Outcome of resolving one single-target statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved { path: PathBuf, name: String },
    Unresolved { name: String },
}

impl Resolution {
    /// Canonical destination, `None` when unresolved.
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved { path, .. } => Some(path),
            Resolution::Unresolved { .. } => None,
        }
    }

    /// Display name for the destination vertex.
    pub fn name(&self) -> &str {
        match self {
            Resolution::Resolved { name, .. } | Resolution::Unresolved { name } => name,
        }
    }
}

/// Search directories and recognized extensions of one solver.
///
/// Populated during configuration and read-only afterwards, so concurrent
/// workers share it without synchronisation.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    include_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    /// File that marks a directory as an importable package.
    package_marker: Option<String>,
}

impl PathResolver {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            include_paths: Vec::new(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            package_marker: None,
        }
    }

    pub fn with_package_marker(mut self, marker: &str) -> Self {
        self.package_marker = Some(marker.to_string());
        self
    }

    /// Append search directories, skipping ones already configured.
    pub fn add_include_paths(&mut self, paths: &[PathBuf]) {
        for path in paths {
            if !self.include_paths.contains(path) {
                self.include_paths.push(path.clone());
            }
        }
    }

    pub fn set_extensions(&mut self, extensions: Vec<String>) {
        self.extensions = extensions;
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Probe `{dir}/{candidate}.{ext}` for each extension, or the candidate
    /// verbatim when the resolver has no probe extensions.
    fn probe_in(&self, dir: &Path, candidate: &Path) -> Option<PathBuf> {
        if self.extensions.is_empty() {
            return canonical_file(&dir.join(candidate));
        }
        let likely = dir.join(candidate);
        self.extensions
            .iter()
            .find_map(|ext| canonical_file(&with_appended_extension(&likely, ext)))
    }

    /// `{dir}/{candidate}/{marker}` when the resolver has a package marker.
    fn probe_package(&self, dir: &Path, candidate: &Path) -> Option<PathBuf> {
        self.package_marker
            .as_ref()
            .and_then(|marker| canonical_file(&dir.join(candidate).join(marker)))
    }

    /// Relative probe against the importing file's directory.
    pub fn probe_relative(&self, importing_dir: &Path, candidate: &Path) -> Option<PathBuf> {
        self.probe_in(importing_dir, candidate)
            .or_else(|| self.probe_package(importing_dir, candidate))
    }

    /// Search-path probe: `{dir}/{raw}` for each configured directory, then
    /// the candidate with extension probing, then the package marker.
    pub fn probe_search_paths(&self, candidate: &Path, raw: &str) -> Option<PathBuf> {
        self.include_paths.iter().find_map(|dir| {
            canonical_file(&dir.join(raw))
                .or_else(|| {
                    if self.extensions.is_empty() {
                        None
                    } else {
                        self.probe_in(dir, candidate)
                    }
                })
                .or_else(|| self.probe_package(dir, candidate))
        })
    }

    /// Full resolution: relative probe, search-path probe, unresolved.
    pub fn resolve(&self, importing_dir: &Path, candidate: &Path, raw: &str) -> Resolution {
        if let Some(path) = self.probe_relative(importing_dir, candidate) {
            log::trace!("   |>> relative edge: {}", path.display());
            return Resolution::Resolved {
                path,
                name: candidate.to_string_lossy().to_string(),
            };
        }
        self.resolve_in_search_paths(candidate, raw)
    }

    /// Resolution that skips the relative probe.
    pub fn resolve_in_search_paths(&self, candidate: &Path, raw: &str) -> Resolution {
        if let Some(path) = self.probe_search_paths(candidate, raw) {
            log::trace!("   |>> search-path edge: {}", path.display());
            return Resolution::Resolved {
                path,
                name: raw.to_string(),
            };
        }
        log::trace!("   |>> unresolved: {raw}");
        Resolution::Unresolved {
            name: raw.to_string(),
        }
    }
}

/// Canonical form of `path` if it names an existing regular file.
fn canonical_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        std::fs::canonicalize(path).ok()
    } else {
        None
    }
}

/// `a/b/mod` + `py` → `a/b/mod.py`, keeping any dots already in the stem.
fn with_appended_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
