#![no_main]
use kit_breakout::config::{CyclePolicy, GraphConfig, IngestConfig};
use kit_breakout::explode::explode;
use kit_breakout::graph::KitGraphBuilder;
use kit_breakout::ingest::parse_table_str;
use kit_breakout::scheduler::CancellationToken;
use libfuzzer_sys::fuzz_target;

/// Fuzz CSV ingest, graph construction and explosion.
///
/// Arbitrary text is read as a kit-definition table and built with the
/// lenient cycle policy, then every assembly is exploded. Nothing may panic
/// and every explosion must terminate.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(rows) = parse_table_str(text) else {
        return;
    };
    let ingest = IngestConfig::default();
    let graph_config = GraphConfig {
        cycle_policy: CyclePolicy::Break,
    };
    let Ok((graph, _)) = KitGraphBuilder::new(&ingest, &graph_config).build(&rows) else {
        return;
    };
    let cancel = CancellationToken::new();
    for kit in graph.assemblies() {
        let _ = explode(&graph, kit, 1.0, "fuzz", &cancel);
    }
});
