//! Shared graph store guarded by a single mutex.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::dependency_graph::DependencyGraph;

/// The one shared mutable resource of a scan.
///
/// Every mutation (vertex lookup or creation, the duplicate check by path and
/// by name, and the edge insertion) runs inside one critical section.
/// Pattern matching and filesystem probing happen outside the lock.
#[derive(Debug, Default)]
pub struct GraphStore {
    graph: Mutex<DependencyGraph>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the graph, recovering from poisoning: an interrupted commit
    /// leaves at most an extra vertex, never a partial edge.
    fn lock(&self) -> MutexGuard<'_, DependencyGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit one dependency edge. Returns whether a new edge was added.
    pub fn commit_edge(
        &self,
        source: &Path,
        destination: Option<&Path>,
        name: &str,
        line_no: usize,
    ) -> bool {
        self.lock().insert_edge(source, destination, name, line_no)
    }

    /// Register a scanned file as a vertex.
    pub fn add_file(&self, path: &Path) {
        self.lock().add_file(path);
    }

    pub fn edge_count(&self) -> usize {
        self.lock().edge_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.lock().vertex_count()
    }

    /// Hand the finished graph to downstream consumers. Consuming the store
    /// guarantees no further mutation.
    pub fn into_graph(self) -> DependencyGraph {
        self.graph
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
