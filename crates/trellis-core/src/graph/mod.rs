//! Dependency graph and the shared store that guards it.

pub mod dependency_graph;
pub mod store;

pub use dependency_graph::{path_key, DependencyGraph, EdgeData, EdgeInfo, VertexData};
pub use store::GraphStore;
