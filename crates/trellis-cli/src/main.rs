//! Trellis CLI — map which files include or import which.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use trellis_core::config::{ScanConfig, SolverOptions};
use trellis_core::output::{build_output, write_output};
use trellis_core::pipeline::{self, ScanOutcome};

#[derive(Parser)]
#[command(
    name = "trellis",
    about = "Trellis - Map include and import dependencies across a codebase"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree and write its dependency graph as JSON
    Scan {
        /// Path to the source tree to scan
        path: PathBuf,

        /// Output JSON file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// C/C++ include search directory (repeatable, searched in order)
        #[arg(short = 'I', long = "include")]
        include: Vec<PathBuf>,

        /// Python module search directory (repeatable, searched in order)
        #[arg(long = "py-path")]
        py_path: Vec<PathBuf>,

        /// Comma-separated solver filter (e.g. "c,python")
        #[arg(short, long)]
        languages: Option<String>,

        /// Additional directory names to exclude
        #[arg(long)]
        exclude: Vec<String>,

        /// Number of scan worker threads
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// JSON configuration file; command-line options extend it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trace every statement and resolution
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "trellis_core=trace"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            path,
            output,
            include,
            py_path,
            languages,
            exclude,
            threads,
            config,
            verbose,
            quiet,
        } => {
            init_logging(verbose, quiet);

            let mut scan_config = match config {
                Some(file) => match ScanConfig::from_json_file(&file) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(1);
                    }
                },
                None => ScanConfig::default(),
            };

            let root = path.canonicalize().unwrap_or(path);
            let root_name = root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "repo".to_string());
            let output_path = output
                .or(scan_config.output_path.clone())
                .unwrap_or_else(|| PathBuf::from(format!("{root_name}.trellis.json")));

            extend_solver(&mut scan_config, "c", include);
            extend_solver(&mut scan_config, "python", py_path);

            if let Some(langs) = languages {
                scan_config.languages = Some(
                    langs
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                );
            }
            scan_config.root = root;
            scan_config.output_path = Some(output_path.clone());
            scan_config.exclude_patterns.extend(exclude);
            scan_config.threads = threads.or(scan_config.threads);
            scan_config.verbose = verbose;
            scan_config.quiet = quiet;

            if quiet {
                run_quiet(&scan_config, &output_path);
            } else {
                run_with_progress(&scan_config, &output_path);
            }
        }
    }
}

/// Append command-line search directories to a solver's configured ones.
fn extend_solver(config: &mut ScanConfig, solver: &str, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        return;
    }
    let key = config
        .solvers
        .keys()
        .find(|k| k.eq_ignore_ascii_case(solver))
        .cloned()
        .unwrap_or_else(|| solver.to_string());
    config
        .solvers
        .entry(key)
        .or_insert_with(SolverOptions::default)
        .include_paths
        .extend(paths);
}

fn finish(config: &ScanConfig, outcome: &ScanOutcome, output_path: &Path) {
    let output = build_output(config, outcome);
    if let Err(e) = write_output(&output, output_path) {
        eprintln!("Error writing output: {e}");
        std::process::exit(1);
    }
}

fn run_quiet(config: &ScanConfig, output_path: &Path) {
    match pipeline::run_scan(config, None) {
        Ok(outcome) => finish(config, &outcome, output_path),
        Err(e) => {
            eprintln!("Scan failed: {e}");
            std::process::exit(1);
        }
    }
}

fn run_with_progress(config: &ScanConfig, output_path: &Path) {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(spinner.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message("Initialising...");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let progress: pipeline::ProgressCallback = {
        let pb = pb.clone();
        Box::new(move |_name, label| {
            pb.set_message(label.to_string());
        })
    };

    let start = Instant::now();
    let outcome = match pipeline::run_scan(config, Some(progress)) {
        Ok(o) => o,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("Scan failed: {e}");
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    let graph = &outcome.graph;
    println!(
        "\n{}  Trellis Scan: {}",
        style("✓").green().bold(),
        style(
            config
                .root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        )
        .bold()
    );
    println!("  {:<14} {}", "Files:", outcome.report.files_scanned);
    println!("  {:<14} {}", "Statements:", outcome.report.statements_matched);
    println!("  {:<14} {}", "Vertices:", graph.vertex_count());
    println!("  {:<14} {}", "Edges:", graph.edge_count());
    println!("  {:<14} {}", "Unresolved:", graph.unresolved_count());
    if !outcome.report.failures.is_empty() {
        println!(
            "  {:<14} {}",
            style("Unreadable:").yellow(),
            outcome.report.failures.len()
        );
    }
    println!(
        "  {:<14} {:.1}ms",
        "Duration:",
        start.elapsed().as_secs_f64() * 1000.0
    );

    if config.verbose {
        println!("\n  Phase Timings:");
        for (phase, secs) in &outcome.timings {
            println!("    {:<14} {:.1}ms", phase, secs * 1000.0);
        }
    }

    finish(config, &outcome, output_path);

    println!(
        "\n  {} {}",
        style("Output written to:").green(),
        output_path.display()
    );
}
