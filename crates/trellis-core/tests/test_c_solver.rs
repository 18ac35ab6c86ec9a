//! C-family solver integration tests.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use trellis_core::graph::GraphStore;
use trellis_core::solvers::c_family::CFamilySolver;
use trellis_core::solvers::Solver;

const QUOTED: usize = 0;
const SYSTEM: usize = 1;

#[test]
fn fixture_main_edges_without_include_paths() {
    let root = fixture_path("c_simple");
    let outcome = scan_dir(&root);
    assert_eq!(
        targets_of(&outcome.graph, &root, "main.c"),
        expected(&[
            ("stdio.h", 1),
            ("util.h", 2),
            ("lib/math.h", 3),
            ("config.h", 4),
        ])
    );
}

#[test]
fn fixture_system_include_resolves_through_include_path() {
    let root = fixture_path("c_simple");
    let outcome = scan_dir_with(&root, "c", vec![root.join("include")]);
    let targets = targets_of(&outcome.graph, &root, "main.c");
    assert!(targets.contains(&("include/config.h".to_string(), 4)));
    assert!(targets.contains(&("stdio.h".to_string(), 1)));
}

#[test]
fn fixture_cycle_maps_to_one_vertex_per_file() {
    let root = fixture_path("c_simple");
    let outcome = scan_dir(&root);
    // lib/math.h includes "../util.h": canonicalisation lands on util.h itself.
    assert_eq!(
        targets_of(&outcome.graph, &root, "lib/math.h"),
        expected(&[("util.h", 3)])
    );
    assert_eq!(
        targets_of(&outcome.graph, &root, "util.h"),
        expected(&[("lib/math.h", 3)])
    );
    let util_key = key_of(&root, "util.h");
    let util_vertices = outcome
        .graph
        .vertices()
        .into_iter()
        .filter(|v| v.key() == util_key)
        .count();
    assert_eq!(util_vertices, 1);
}

#[test]
fn fixture_duplicate_include_suppressed() {
    let root = fixture_path("c_simple");
    let outcome = scan_dir(&root);
    let edges = edges_of(&outcome.graph, &root, "main.c");
    let util = key_of(&root, "util.h");
    let util_edges: Vec<_> = edges.iter().filter(|e| e.destination == util).collect();
    assert_eq!(util_edges.len(), 1);
    assert_eq!(util_edges[0].line_no, 2);
}

#[test]
fn quoted_include_falls_back_to_search_path() {
    let (_dir, root) = temp_tree(&[("src/main.c", ""), ("shared/common.h", "")]);
    let mut solver = CFamilySolver::new();
    solver
        .configure(&trellis_core::config::SolverOptions::with_include_paths([root.join("shared")]))
        .unwrap();
    let store = GraphStore::new();
    assert_eq!(
        solver.handle_match(&store, &root.join("src/main.c"), "common.h", QUOTED, 12),
        1
    );
    let edges = store.into_graph().edges();
    assert_eq!(edges[0].destination, key_of(&root, "shared/common.h"));
    assert_eq!(edges[0].name, "common.h");
    assert_eq!(edges[0].line_no, 12);
}

#[test]
fn system_include_skips_relative_probe() {
    let (_dir, root) = temp_tree(&[("main.c", ""), ("local.h", "")]);
    let solver = CFamilySolver::new();
    let store = GraphStore::new();
    solver.handle_match(&store, &root.join("main.c"), "local.h", SYSTEM, 1);
    let edges = store.into_graph().edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].destination, "");
    assert_eq!(edges[0].target, "local.h");
}

#[test]
fn include_name_is_used_verbatim() {
    let (_dir, root) = temp_tree(&[("main.c", ""), ("v1.2/api.h", "")]);
    let solver = CFamilySolver::new();
    let store = GraphStore::new();
    solver.handle_match(&store, &root.join("main.c"), "v1.2/api.h", QUOTED, 1);
    let edges = store.into_graph().edges();
    assert_eq!(edges[0].destination, key_of(&root, "v1.2/api.h"));
}
