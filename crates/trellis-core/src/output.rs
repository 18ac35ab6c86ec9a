//! JSON serialisation of a finished scan.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;

use crate::config::{EdgeOutput, GraphOutput, ScanConfig, ScanStats, VertexOutput};
use crate::error::{Result, TrellisError};
use crate::pipeline::ScanOutcome;

/// Build the output document from a scan outcome.
pub fn build_output(config: &ScanConfig, outcome: &ScanOutcome) -> GraphOutput {
    let graph = &outcome.graph;

    let mut metadata = HashMap::new();
    metadata.insert(
        "root".to_string(),
        serde_json::Value::String(config.root.to_string_lossy().to_string()),
    );
    metadata.insert(
        "generated_at".to_string(),
        serde_json::Value::String(Utc::now().to_rfc3339()),
    );
    metadata.insert("solvers".to_string(), serde_json::json!(outcome.solvers));
    let timings: serde_json::Map<String, serde_json::Value> = outcome
        .timings
        .iter()
        .map(|(phase, secs)| (phase.clone(), serde_json::json!(secs)))
        .collect();
    metadata.insert(
        "phase_timings".to_string(),
        serde_json::Value::Object(timings),
    );
    metadata.insert(
        "analysis_duration_ms".to_string(),
        serde_json::json!(outcome.total_ms),
    );

    let mut vertices: Vec<VertexOutput> = graph
        .vertices()
        .into_iter()
        .map(|v| VertexOutput {
            key: v.key(),
            label: v.label().to_string(),
            resolved: v.is_resolved(),
        })
        .collect();
    vertices.sort_by(|a, b| a.key.cmp(&b.key));

    let mut edges: Vec<EdgeOutput> = graph
        .edges()
        .into_iter()
        .map(|e| EdgeOutput {
            from: e.source,
            to: e.target,
            destination: e.destination,
            name: e.name,
            line: e.line_no,
        })
        .collect();
    edges.sort_by(|a, b| (&a.from, a.line, &a.to).cmp(&(&b.from, b.line, &b.to)));

    let stats = ScanStats {
        files: outcome.report.files_scanned,
        failed_files: outcome.report.failures.len(),
        statements: outcome.report.statements_matched,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        unresolved: graph.unresolved_count(),
    };

    GraphOutput {
        version: "1.0".to_string(),
        metadata,
        stats,
        vertices,
        edges,
    }
}

/// Write the output document as pretty-printed JSON.
pub fn write_output(output: &GraphOutput, path: &Path) -> Result<()> {
    let to_error = |source: std::io::Error| TrellisError::Output {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(output).map_err(|e| to_error(e.into()))?;
    std::fs::write(path, json).map_err(to_error)
}
