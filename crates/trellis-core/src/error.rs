//! Error types shared by the solver, scanner and output layers.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by Trellis.
///
/// Unsupported statements, unresolved references and duplicate edges are not
/// errors: they are encoded in the graph. Configuration variants are fatal and
/// are only produced before scanning starts; `SourceRead` is reported per file.
#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("solver '{solver}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        solver: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("solver '{solver}': invalid file extension '{extension}'")]
    InvalidExtension { solver: String, extension: String },

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("failed to read {}: {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrellisError {
    /// Whether this error must abort a run before any file is scanned.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. }
                | Self::InvalidExtension { .. }
                | Self::UnknownLanguage(_)
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrellisError>;
