//! Integration tests for order-line filtering.

use kit_breakout::config::{GraphConfig, IngestConfig, KeyMatchMode};
use kit_breakout::filter::{filter_lines, KeyMatcher};
use kit_breakout::graph::KitGraphBuilder;
use kit_breakout::model::{LineItem, OrderLayout};
use kit_breakout::scheduler::CancellationToken;
use kit_breakout::KitGraph;

fn build(values: &[[&str; 6]]) -> KitGraph {
    let rows: Vec<Vec<String>> = values
        .iter()
        .map(|row| row.iter().map(|s| (*s).to_string()).collect())
        .collect();
    let ingest = IngestConfig {
        kits_have_header: false,
        ..IngestConfig::default()
    };
    KitGraphBuilder::new(&ingest, &GraphConfig::default())
        .build(&rows)
        .expect("graph should build")
        .0
}

fn two_level() -> KitGraph {
    build(&[
        ["KIT-A", "Kit A", "1", "2", "leaf1", ""],
        ["KIT-A", "Kit A", "1", "3", "KIT-B", ""],
        ["KIT-B", "Kit B", "2", "5", "leaf2", ""],
    ])
}

fn order(items: &[&str]) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| LineItem::from_strs(&["SO-1", *item, "1"]))
        .collect()
}

fn run(lines: &[LineItem], graph: &KitGraph, mode: KeyMatchMode) -> Vec<String> {
    filter_lines(
        lines,
        graph,
        &OrderLayout::default(),
        KeyMatcher::new(mode),
        &CancellationToken::new(),
    )
    .completed()
    .expect("not cancelled")
    .lines
    .iter()
    .map(|line| line.field(1).to_string())
    .collect()
}

#[test]
fn kit_line_kept_and_its_leaf_removed() {
    let graph = two_level();
    let kept = run(&order(&["KIT-A", "leaf1", "other"]), &graph, KeyMatchMode::Contains);
    assert_eq!(kept, ["KIT-A", "other"]);
}

#[test]
fn nested_kit_components_removed() {
    let graph = two_level();
    let kept = run(
        &order(&["leaf2", "KIT-A", "KIT-B", "rope", "leaf1"]),
        &graph,
        KeyMatchMode::Contains,
    );
    // KIT-B is reachable from KIT-A, so its own line goes too
    assert_eq!(kept, ["KIT-A", "rope"]);
}

#[test]
fn order_without_kits_unchanged() {
    let graph = two_level();
    let lines = order(&["leaf1", "leaf2"]);
    let result = filter_lines(
        &lines,
        &graph,
        &OrderLayout::default(),
        KeyMatcher::default(),
        &CancellationToken::new(),
    )
    .completed()
    .expect("not cancelled");
    assert_eq!(result.lines, lines);
    assert_eq!(result.stats.kit_lines, 0);
    assert_eq!(result.stats.removed, 0);
}

#[test]
fn contains_mode_removes_decorated_keys_exact_does_not() {
    let graph = two_level();
    let lines = order(&["KIT-A", "LEAF1#", "leaf10"]);

    assert_eq!(run(&lines, &graph, KeyMatchMode::Contains), ["KIT-A"]);
    assert_eq!(run(&lines, &graph, KeyMatchMode::Exact), ["KIT-A", "LEAF1#", "leaf10"]);
}

#[test]
fn filtering_twice_changes_nothing() {
    let graph = two_level();
    let lines = order(&["KIT-A", "leaf1", "KIT-B", "leaf2", "rope"]);
    let layout = OrderLayout::default();
    let cancel = CancellationToken::new();

    let once = filter_lines(&lines, &graph, &layout, KeyMatcher::default(), &cancel)
        .completed()
        .expect("not cancelled");
    let twice = filter_lines(&once.lines, &graph, &layout, KeyMatcher::default(), &cancel)
        .completed()
        .expect("not cancelled");
    assert_eq!(once.lines, twice.lines);
    assert_eq!(twice.stats.removed, 0);
}

#[test]
fn cancelled_filter_returns_status() {
    let graph = two_level();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = filter_lines(
        &order(&["KIT-A", "leaf1"]),
        &graph,
        &OrderLayout::default(),
        KeyMatcher::default(),
        &cancel,
    );
    assert!(outcome.is_cancelled());
}
