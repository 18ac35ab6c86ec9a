//! In-memory dependency graph backed by petgraph::DiGraph.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Vertex data stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexData {
    /// A file on disk, keyed by its canonical path.
    File { path: PathBuf, label: String },
    /// A reference no resolution strategy could match, keyed by its raw name.
    Unresolved { name: String },
}

impl VertexData {
    pub fn key(&self) -> String {
        match self {
            VertexData::File { path, .. } => path_key(path),
            VertexData::Unresolved { name } => name.clone(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            VertexData::File { label, .. } => label,
            VertexData::Unresolved { name } => name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, VertexData::File { .. })
    }
}

/// Edge data stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeData {
    /// 1-based line of the statement that produced the edge.
    pub line_no: usize,
    /// Module or file name as written in that statement.
    pub name: String,
}

/// A flat representation of one dependency edge for queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeInfo {
    pub source: String,
    pub target: String,
    /// Empty for unresolved references.
    pub destination: String,
    pub name: String,
    pub line_no: usize,
}

impl EdgeInfo {
    pub fn is_resolved(&self) -> bool {
        !self.destination.is_empty()
    }
}

/// Vertex key for a filesystem path.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// File vertex label: the bare file name.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path_key(path))
}

/// Directed file dependency graph with keyed, idempotent vertices and
/// deduplicated edges.
///
/// This type is not synchronised; concurrent writers go through
/// [`GraphStore`](super::store::GraphStore).
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<VertexData, EdgeData>,
    /// O(1) vertex key → NodeIndex lookup.
    key_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create a vertex. Re-adding an existing key is a no-op.
    fn ensure_vertex(&mut self, data: VertexData) -> NodeIndex {
        let key = data.key();
        if let Some(&idx) = self.key_index.get(&key) {
            idx
        } else {
            let idx = self.graph.add_node(data);
            self.key_index.insert(key, idx);
            idx
        }
    }

    /// Register a scanned source file as a vertex.
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        self.ensure_vertex(VertexData::File {
            path: path.to_path_buf(),
            label: file_label(path),
        })
    }

    /// Whether `source` already has an edge to a vertex keyed by `key`.
    fn has_edge_to_key(&self, source: NodeIndex, key: &str) -> bool {
        self.key_index
            .get(key)
            .is_some_and(|&target| self.graph.find_edge(source, target).is_some())
    }

    /// Insert a dependency edge from `source` to `destination`, or to the
    /// unresolved vertex `name` when `destination` is `None`.
    ///
    /// An edge already present from `source` to a vertex keyed by either
    /// `name` or the destination path blocks the insertion. The statement's
    /// `name` is kept on the edge, so it does not depend on which side of the
    /// edge was seen first. Returns whether a new edge was added.
    pub fn insert_edge(
        &mut self,
        source: &Path,
        destination: Option<&Path>,
        name: &str,
        line_no: usize,
    ) -> bool {
        let src_idx = self.add_file(source);

        let duplicate = self.has_edge_to_key(src_idx, name)
            || destination.is_some_and(|dst| self.has_edge_to_key(src_idx, &path_key(dst)));
        if duplicate {
            log::trace!(
                "duplicate edge suppressed: {} -> {} (line {})",
                source.display(),
                name,
                line_no
            );
            return false;
        }

        let dst_idx = match destination {
            Some(dst) => self.add_file(dst),
            None => self.ensure_vertex(VertexData::Unresolved {
                name: name.to_string(),
            }),
        };

        log::trace!(
            "insert edge: {} -> {} ({}, line {})",
            source.display(),
            destination
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| name.to_string()),
            name,
            line_no
        );
        self.graph.add_edge(
            src_idx,
            dst_idx,
            EdgeData {
                line_no,
                name: name.to_string(),
            },
        );
        true
    }

    // --- Queries ---

    /// Check if a vertex exists.
    pub fn has_vertex(&self, key: &str) -> bool {
        self.key_index.contains_key(key)
    }

    /// Get vertex data by key.
    pub fn vertex(&self, key: &str) -> Option<&VertexData> {
        self.key_index
            .get(key)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn vertices(&self) -> Vec<&VertexData> {
        self.graph.node_weights().collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges, in insertion order.
    pub fn edges(&self) -> Vec<EdgeInfo> {
        self.graph
            .edge_references()
            .map(|edge| self.edge_info(edge.source(), edge.target(), edge.weight()))
            .collect()
    }

    /// Outgoing edges of the vertex keyed by `key`, by line then insertion.
    pub fn edges_from(&self, key: &str) -> Vec<EdgeInfo> {
        let Some(&idx) = self.key_index.get(key) else {
            return Vec::new();
        };
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|edge| (edge.weight().line_no, edge.id()));
        edges
            .into_iter()
            .map(|edge| self.edge_info(edge.source(), edge.target(), edge.weight()))
            .collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|v| !v.is_resolved())
            .count()
    }

    fn edge_info(&self, src: NodeIndex, tgt: NodeIndex, data: &EdgeData) -> EdgeInfo {
        let source = &self.graph[src];
        let target = &self.graph[tgt];
        let destination = match target {
            VertexData::File { path, .. } => path_key(path),
            VertexData::Unresolved { .. } => String::new(),
        };
        EdgeInfo {
            source: source.key(),
            target: target.key(),
            destination,
            name: data.name.clone(),
            line_no: data.line_no,
        }
    }
}
