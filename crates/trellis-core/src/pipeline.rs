//! Sequential phase orchestrator with timing.

use std::time::Instant;

use crate::config::ScanConfig;
use crate::discovery::discover_files;
use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::scan::{ScanReport, Scanner};
use crate::solvers::SolverRegistry;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("configure", "Configuring solvers"),
    ("discovery", "Discovering source files"),
    ("scanning", "Resolving includes and imports"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// Everything a scan run hands to downstream consumers.
#[derive(Debug)]
pub struct ScanOutcome {
    pub graph: DependencyGraph,
    pub report: ScanReport,
    pub solvers: Vec<String>,
    /// Seconds per phase, in execution order.
    pub timings: Vec<(String, f64)>,
    pub total_ms: f64,
}

fn report_phase(progress: &mut Option<ProgressCallback>, name: &str) {
    if let Some(cb) = progress {
        let label = PHASE_LABELS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, l)| *l)
            .unwrap_or(name);
        cb(name, label);
    }
}

/// Configure solvers, discover files, scan them, and return the frozen graph.
///
/// Configuration problems abort before any file is read; unreadable files are
/// listed in the report.
pub fn run_scan(
    config: &ScanConfig,
    mut progress: Option<ProgressCallback>,
) -> Result<ScanOutcome> {
    let total_start = Instant::now();
    let mut timings = Vec::new();

    report_phase(&mut progress, "configure");
    let start = Instant::now();
    let registry = SolverRegistry::from_config(config)?;
    let solvers: Vec<String> = registry.names().into_iter().map(String::from).collect();
    timings.push(("configure".to_string(), start.elapsed().as_secs_f64()));

    report_phase(&mut progress, "discovery");
    let start = Instant::now();
    let files = discover_files(config, &registry)?;
    timings.push(("discovery".to_string(), start.elapsed().as_secs_f64()));

    report_phase(&mut progress, "scanning");
    let start = Instant::now();
    let scanner = Scanner::new(registry);
    let report = scanner.scan_files(&files, config.threads);
    let graph = scanner.into_graph();
    timings.push(("scanning".to_string(), start.elapsed().as_secs_f64()));

    log::info!(
        "scanned {} files: {} statements, {} edges, {} failures",
        report.files_scanned,
        report.statements_matched,
        graph.edge_count(),
        report.failures.len()
    );

    Ok(ScanOutcome {
        graph,
        report,
        solvers,
        timings,
        total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
    })
}
