//! Orchestrator behaviour over hand-built graphs.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::graph::{DependencyGraph, DependencyNode, ExcludeReason, SelectionKind};
use crate::selection::SelectionOrchestrator;

fn p(s: &str) -> PathBuf {
    PathBuf::from(format!("/project/{s}"))
}

fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
    paths.iter().map(|s| p(s)).collect()
}

/// A graph rooted at `root` holding `deps` at the given depths.
fn graph(root: &str, deps: &[(&str, usize)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new(p(root));
    graph.add_node(DependencyNode::new(p(root), 0));
    for (dep, depth) in deps {
        graph.add_node(DependencyNode::new(p(dep), *depth));
    }
    graph
}

#[test]
fn test_apply_root_selects_dependencies_but_not_the_root() {
    let selection = SelectionOrchestrator::new();

    let update = selection.apply_root(&p("app.ts"), &graph("app.ts", &[("a.ts", 1), ("b.ts", 2)]));

    assert_eq!(update.added, set(&["a.ts", "b.ts"]));
    assert!(update.removed.is_empty());
    assert!(!selection.is_selected(&p("app.ts")));
    assert_eq!(update.metadata[&p("b.ts")].depth, 2);
    assert_eq!(
        update.metadata[&p("a.ts")].selection_kind,
        SelectionKind::AutoDependency
    );
    assert_eq!(selection.roots(), set(&["app.ts"]));
}

#[test]
fn test_shared_dependency_survives_until_last_root_is_removed() {
    let selection = SelectionOrchestrator::new();
    selection.apply_root(&p("r1.ts"), &graph("r1.ts", &[("shared.ts", 1)]));
    let second = selection.apply_root(
        &p("r2.ts"),
        &graph("r2.ts", &[("shared.ts", 2), ("only2.ts", 1)]),
    );

    assert_eq!(second.added, set(&["only2.ts"]), "shared was already selected");
    let record = selection.record(&p("shared.ts")).unwrap();
    assert_eq!(record.selected_by(), set(&["r1.ts", "r2.ts"]));
    assert_eq!(record.min_depth(), Some(1));

    let first_removed = selection.remove_root(&p("r1.ts"));
    assert!(first_removed.removed.is_empty());
    assert!(selection.is_selected(&p("shared.ts")));
    let remaining = &first_removed.metadata[&p("shared.ts")];
    assert_eq!(remaining.selected_by, set(&["r2.ts"]));
    assert_eq!(remaining.depth, 2);

    let last_removed = selection.remove_root(&p("r2.ts"));
    assert_eq!(last_removed.removed, set(&["only2.ts", "shared.ts"]));
    assert!(selection.is_empty());
    assert!(selection.roots().is_empty());
}

#[test]
fn test_reapplying_a_root_reports_the_difference() {
    let selection = SelectionOrchestrator::new();
    selection.apply_root(&p("app.ts"), &graph("app.ts", &[("a.ts", 1), ("b.ts", 1)]));

    let update = selection.apply_root(&p("app.ts"), &graph("app.ts", &[("a.ts", 1), ("c.ts", 1)]));

    assert_eq!(update.added, set(&["c.ts"]));
    assert_eq!(update.removed, set(&["b.ts"]));
    assert_eq!(
        update.metadata.keys().cloned().collect::<BTreeSet<_>>(),
        set(&["a.ts", "c.ts"])
    );
    assert_eq!(selection.selected(), set(&["a.ts", "c.ts"]));
}

#[test]
fn test_removing_unknown_root_is_a_no_op() {
    let selection = SelectionOrchestrator::new();
    selection.apply_root(&p("app.ts"), &graph("app.ts", &[("a.ts", 1)]));

    let update = selection.remove_root(&p("other.ts"));

    assert!(update.is_empty());
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_test_files_are_auto_tests_unless_also_dependencies() {
    let selection = SelectionOrchestrator::new();
    let mut g = graph("app.ts", &[("a.ts", 1), ("helper.test.ts", 2)]);
    g.nodes
        .get_mut(&p("a.ts"))
        .unwrap()
        .test_files
        .extend([p("a.test.ts"), p("helper.test.ts")]);

    let update = selection.apply_root(&p("app.ts"), &g);

    assert_eq!(update.added, set(&["a.test.ts", "a.ts", "helper.test.ts"]));
    let test = &update.metadata[&p("a.test.ts")];
    assert_eq!(test.selection_kind, SelectionKind::AutoTest);
    assert_eq!(test.depth, 1);
    assert_eq!(
        update.metadata[&p("helper.test.ts")].selection_kind,
        SelectionKind::AutoDependency
    );
}

#[test]
fn test_dependency_kind_wins_across_roots() {
    let selection = SelectionOrchestrator::new();
    let mut tests_only = graph("r1.ts", &[]);
    tests_only
        .nodes
        .get_mut(&p("r1.ts"))
        .unwrap()
        .test_files
        .insert(p("x.ts"));
    selection.apply_root(&p("r1.ts"), &tests_only);
    assert_eq!(
        selection.record(&p("x.ts")).unwrap().kind(),
        SelectionKind::AutoTest
    );

    selection.apply_root(&p("r2.ts"), &graph("r2.ts", &[("x.ts", 1)]));
    assert_eq!(
        selection.record(&p("x.ts")).unwrap().kind(),
        SelectionKind::AutoDependency
    );

    let update = selection.remove_root(&p("r2.ts"));
    assert_eq!(update.metadata[&p("x.ts")].selection_kind, SelectionKind::AutoTest);
}

#[test]
fn test_excluded_nodes_are_never_selected() {
    let selection = SelectionOrchestrator::new();
    let mut g = graph("app.ts", &[("a.ts", 1)]);
    let mut vendored = DependencyNode::new(p("vendor/lib.ts"), 1);
    vendored.excluded = true;
    vendored.exclude_reason = Some(ExcludeReason::UserPattern);
    g.add_node(vendored);

    let update = selection.apply_root(&p("app.ts"), &g);

    assert_eq!(update.added, set(&["a.ts"]));
    assert!(!selection.is_selected(&p("vendor/lib.ts")));
}

#[test]
fn test_root_of_one_graph_can_be_a_dependency_of_another() {
    let selection = SelectionOrchestrator::new();
    selection.apply_root(&p("a.ts"), &graph("a.ts", &[("b.ts", 1)]));
    selection.apply_root(&p("b.ts"), &graph("b.ts", &[("a.ts", 1)]));

    assert_eq!(selection.selected(), set(&["a.ts", "b.ts"]));

    let update = selection.remove_root(&p("a.ts"));
    assert_eq!(update.removed, set(&["b.ts"]));
    assert!(selection.is_selected(&p("a.ts")));
}

#[test]
fn test_update_serializes_as_camel_case() {
    let selection = SelectionOrchestrator::new();
    let update = selection.apply_root(&p("app.ts"), &graph("app.ts", &[("a.ts", 1)]));

    let json = serde_json::to_value(&update).unwrap();

    assert_eq!(json["added"], serde_json::json!(["/project/a.ts"]));
    assert_eq!(json["removed"], serde_json::json!([]));
    let meta = &json["metadata"]["/project/a.ts"];
    assert_eq!(meta["selectionKind"], "auto-dependency");
    assert_eq!(meta["selectedBy"], serde_json::json!(["/project/app.ts"]));
    assert_eq!(meta["depth"], 1);
}

#[test]
fn test_concurrent_apply_and_remove_keep_records_consistent() {
    let selection = SelectionOrchestrator::new();
    let app = graph("app.ts", &[("shared.ts", 1), ("a.ts", 1), ("b.ts", 2)]);
    let other = graph("other.ts", &[("shared.ts", 1), ("c.ts", 1)]);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let selection = &selection;
            let (app, other) = (&app, &other);
            scope.spawn(move || {
                for round in 0..200 {
                    let (root, graph) = if (worker + round) % 2 == 0 {
                        (p("app.ts"), app)
                    } else {
                        (p("other.ts"), other)
                    };
                    if round % 3 == 0 {
                        selection.remove_root(&root);
                    } else {
                        selection.apply_root(&root, graph);
                    }
                }
            });
        }
    });

    let roots = selection.roots();
    for path in selection.selected() {
        let record = selection.record(&path).unwrap();
        assert!(
            record.selected_by().is_subset(&roots),
            "{} is held by a root that is no longer tracked",
            path.display()
        );
    }

    for root in roots {
        selection.remove_root(&root);
    }
    assert!(selection.is_empty());
}
