//! Trellis Core — build a file dependency graph from include and import
//! statements.
//!
//! Each language solver recognises its statement grammar line by line,
//! resolves every referenced module or header to a canonical file on disk,
//! and commits the edges into one graph shared by all scan workers.

pub mod config;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod scan;
pub mod solvers;

pub use error::{Result, TrellisError};
