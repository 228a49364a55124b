//! Integration tests for kit explosion.
//!
//! Builds graphs from raw kit-definition rows and checks the emitted rows and
//! totals for whole-catalog and per-order explosion.

use kit_breakout::config::{CatalogConfig, CyclePolicy, GraphConfig, IngestConfig};
use kit_breakout::explode::{explode, explode_catalog, explode_order};
use kit_breakout::error::BuildErrorKind;
use kit_breakout::graph::KitGraphBuilder;
use kit_breakout::model::{BreakoutRowKind, LineItem, OrderLayout};
use kit_breakout::scheduler::CancellationToken;
use kit_breakout::{KitError, KitGraph};

fn rows(values: &[[&str; 6]]) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|row| row.iter().map(|s| (*s).to_string()).collect())
        .collect()
}

fn build(values: &[[&str; 6]]) -> KitGraph {
    let ingest = IngestConfig {
        kits_have_header: false,
        ..IngestConfig::default()
    };
    KitGraphBuilder::new(&ingest, &GraphConfig::default())
        .build(&rows(values))
        .expect("graph should build")
        .0
}

/// KIT-A holds leaf1 x2 and KIT-B x3; KIT-B holds leaf2 x5.
fn two_level() -> KitGraph {
    build(&[
        ["KIT-A", "Kit A", "1", "3", "KIT-B", "Kit B"],
        ["KIT-A", "Kit A", "1", "2", "leaf1", "Leaf one"],
        ["KIT-B", "Kit B", "2", "5", "leaf2", "Leaf two"],
    ])
}

// ============================================================================
// Single explosion
// ============================================================================

mod single {
    use super::*;

    #[test]
    fn two_level_kit_rows_and_totals() {
        let graph = two_level();
        let root = graph.get("KIT-A").expect("root exists");
        let explosion = explode(&graph, root, 1.0, "SO-1", &CancellationToken::new())
            .completed()
            .expect("not cancelled");

        let emitted: Vec<_> = explosion
            .rows
            .iter()
            .map(|r| {
                (
                    r.parent_key.as_str(),
                    r.subassembly_key.as_str(),
                    r.item_key.as_str(),
                    r.unit_quantity,
                    r.total_quantity,
                    r.kind,
                )
            })
            .collect();
        assert_eq!(
            emitted,
            [
                ("KIT-A", "KIT-A", "KIT-A", 1.0, 1.0, BreakoutRowKind::Root),
                ("KIT-A", "KIT-A", "leaf1", 2.0, 2.0, BreakoutRowKind::Component),
                ("KIT-A", "KIT-A", "KIT-B", 3.0, 3.0, BreakoutRowKind::Component),
                ("KIT-A", "KIT-B", "leaf2", 5.0, 15.0, BreakoutRowKind::Component),
            ]
        );

        let totals: Vec<_> = explosion.totals.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(totals, [("leaf1", 2.0), ("leaf2", 15.0)]);
    }

    #[test]
    fn nested_kit_exploded_on_its_own() {
        let graph = build(&[
            ["KIT-A", "Kit A", "1", "1", "KIT-EMPTY", ""],
            ["KIT-EMPTY", "Empty", "1", "0", "spacer", ""],
        ]);
        let explosion = explode(
            &graph,
            graph.get("KIT-EMPTY").expect("node"),
            4.0,
            "g",
            &CancellationToken::new(),
        )
        .completed()
        .expect("not cancelled");
        assert_eq!(explosion.rows[0].kind, BreakoutRowKind::Root);
        assert_eq!(explosion.rows[0].total_quantity, 4.0);
        assert_eq!(explosion.totals["spacer"], 0.0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = two_level();
        let root = graph.get("KIT-A").expect("root exists");
        let first = explode(&graph, root, 2.5, "g", &CancellationToken::new());
        let second = explode(&graph, root, 2.5, "g", &CancellationToken::new());
        assert_eq!(first, second);
    }

    #[test]
    fn leaves_are_emitted_before_nested_kits() {
        let graph = build(&[
            ["KIT-A", "", "", "1", "KIT-B", ""],
            ["KIT-A", "", "", "1", "bolt", ""],
            ["KIT-A", "", "", "1", "KIT-C", ""],
            ["KIT-A", "", "", "1", "nut", ""],
            ["KIT-B", "", "", "1", "washer", ""],
            ["KIT-C", "", "", "1", "pin", ""],
        ]);
        let explosion = explode(
            &graph,
            graph.get("KIT-A").expect("root"),
            1.0,
            "g",
            &CancellationToken::new(),
        )
        .completed()
        .expect("not cancelled");
        let items: Vec<_> = explosion.rows.iter().map(|r| r.item_key.as_str()).collect();
        assert_eq!(items, ["KIT-A", "bolt", "nut", "KIT-B", "washer", "KIT-C", "pin"]);
    }
}

// ============================================================================
// Catalog and order explosion
// ============================================================================

mod catalog {
    use super::*;

    #[test]
    fn only_top_level_kits_by_default() {
        let graph = two_level();
        let explosions = explode_catalog(&graph, &CatalogConfig::default(), &CancellationToken::new())
            .completed()
            .expect("not cancelled");

        assert_eq!(explosions.len(), 1);
        assert!(explosions[0].rows.iter().all(|r| r.group_id == "KIT-A"));
    }

    #[test]
    fn child_assemblies_when_requested() {
        let graph = two_level();
        let config = CatalogConfig {
            include_child_assemblies: true,
        };
        let explosions = explode_catalog(&graph, &config, &CancellationToken::new())
            .completed()
            .expect("not cancelled");

        let groups: Vec<_> = explosions.iter().map(|e| e.rows[0].group_id.as_str()).collect();
        assert_eq!(groups, ["KIT-A", "KIT-B"]);
    }
}

mod orders {
    use super::*;

    #[test]
    fn ordered_quantity_multiplies_and_totals_are_sorted() {
        let graph = two_level();
        let lines = vec![
            LineItem::from_strs(&["SO-1", "KIT-B", "1"]),
            LineItem::from_strs(&["SO-1", "rope", "9"]),
            LineItem::from_strs(&["SO-1", "KIT-A", "2"]),
        ];
        let breakout = explode_order(
            &graph,
            "SO-1",
            &lines,
            &OrderLayout::default(),
            &CancellationToken::new(),
        )
        .completed()
        .expect("not cancelled");

        assert!(breakout.has_kits());
        let roots: Vec<_> = breakout
            .rows
            .iter()
            .filter(|r| r.kind == BreakoutRowKind::Root)
            .map(|r| (r.item_key.as_str(), r.total_quantity))
            .collect();
        assert_eq!(roots, [("KIT-B", 1.0), ("KIT-A", 2.0)]);

        let totals: Vec<_> = breakout
            .totals
            .iter()
            .map(|t| (t.item_key.as_str(), t.total_quantity))
            .collect();
        assert_eq!(totals, [("leaf1", 4.0), ("leaf2", 35.0)]);
        assert!(breakout.totals.iter().all(|t| t.group_id == "SO-1"));
    }

    #[test]
    fn order_without_kits_has_no_totals() {
        let graph = two_level();
        let lines = vec![LineItem::from_strs(&["SO-2", "rope", "1"])];
        let breakout = explode_order(
            &graph,
            "SO-2",
            &lines,
            &OrderLayout::default(),
            &CancellationToken::new(),
        )
        .completed()
        .expect("not cancelled");

        assert!(!breakout.has_kits());
        assert!(breakout.rows.is_empty());
        assert!(breakout.totals.is_empty());
    }

    #[test]
    fn unparsable_ordered_quantity_counts_as_zero() {
        let graph = two_level();
        let lines = vec![LineItem::from_strs(&["SO-3", "KIT-B", "lots"])];
        let breakout = explode_order(
            &graph,
            "SO-3",
            &lines,
            &OrderLayout::default(),
            &CancellationToken::new(),
        )
        .completed()
        .expect("not cancelled");

        assert_eq!(breakout.bad_quantities, 1);
        assert_eq!(breakout.totals[0].total_quantity, 0.0);
    }
}

// ============================================================================
// Cycles
// ============================================================================

mod cycles {
    use super::*;

    fn cyclic_rows() -> Vec<Vec<String>> {
        rows(&[
            ["KIT-A", "", "", "1", "KIT-B", ""],
            ["KIT-B", "", "", "1", "KIT-A", ""],
            ["KIT-B", "", "", "2", "leaf", ""],
        ])
    }

    fn ingest() -> IngestConfig {
        IngestConfig {
            kits_have_header: false,
            ..IngestConfig::default()
        }
    }

    #[test]
    fn rejected_at_build_time_by_default() {
        let err = KitGraphBuilder::new(&ingest(), &GraphConfig::default())
            .build(&cyclic_rows())
            .expect_err("cycle must be rejected");
        match err {
            KitError::Build {
                source: BuildErrorKind::Cycle { path },
                ..
            } => assert_eq!(path, ["KIT-A", "KIT-B", "KIT-A"]),
            other => panic!("expected cycle error, got {other}"),
        }
    }

    #[test]
    fn broken_cycle_explosion_terminates() {
        let config = GraphConfig {
            cycle_policy: CyclePolicy::Break,
        };
        let (graph, diagnostics) = KitGraphBuilder::new(&ingest(), &config)
            .build(&cyclic_rows())
            .expect("accepted under break policy");
        assert_eq!(diagnostics.cycles.len(), 1);

        for key in ["KIT-A", "KIT-B"] {
            let explosion = explode(
                &graph,
                graph.get(key).expect("node"),
                1.0,
                key,
                &CancellationToken::new(),
            )
            .completed()
            .expect("not cancelled");
            assert_eq!(explosion.stats.cycle_breaks, 1);
            assert!(explosion.rows.len() <= 4);
        }
    }
}
