//! Configuration types for kit-breakout operations.
//!
//! Every component receives the section it needs explicitly; there is no
//! process-wide configuration state.

use super::defaults::{
    DEFAULT_EXPLOSION_WORKERS, DEFAULT_FILTER_WORKERS, DEFAULT_IGNORED_COMPONENT_PREFIX,
};
use crate::model::OrderLayout;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Kit-definition ingest rules
    pub ingest: IngestConfig,
    /// Order line-item column layout
    pub orders: OrdersConfig,
    /// Kit graph construction rules
    pub graph: GraphConfig,
    /// Line-item matching used by the filter
    pub matching: MatchingConfig,
    /// Whole-catalog explosion options
    pub catalog: CatalogConfig,
    /// Worker pool sizing and completion policy
    pub scheduler: SchedulerConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set how rows that cannot be used are handled.
    pub const fn invalid_rows(mut self, policy: InvalidRowPolicy) -> Self {
        self.config.ingest.invalid_rows = policy;
        self
    }

    /// Set whether the kit table starts with a header row.
    pub const fn kits_have_header(mut self, has_header: bool) -> Self {
        self.config.ingest.kits_have_header = has_header;
        self
    }

    /// Set the order line-item columns.
    pub const fn order_layout(mut self, layout: OrderLayout) -> Self {
        self.config.orders.group_column = layout.group_column;
        self.config.orders.item_key_column = layout.item_key_column;
        self.config.orders.quantity_column = layout.quantity_column;
        self
    }

    /// Set the cycle policy.
    pub const fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.config.graph.cycle_policy = policy;
        self
    }

    /// Set the line-item key matching mode.
    pub const fn match_mode(mut self, mode: KeyMatchMode) -> Self {
        self.config.matching.mode = mode;
        self
    }

    /// Explode child assemblies as catalog roots too.
    pub const fn include_child_assemblies(mut self, include: bool) -> Self {
        self.config.catalog.include_child_assemblies = include;
        self
    }

    /// Set both worker pool sizes.
    pub const fn workers(mut self, workers: usize) -> Self {
        self.config.scheduler.explosion_workers = workers;
        self.config.scheduler.filter_workers = workers;
        self
    }

    /// Set the completion timeout.
    pub const fn completion_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.scheduler.completion_timeout_secs = secs;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Ingest
// ============================================================================

/// What to do with a kit-definition row that is structurally unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvalidRowPolicy {
    /// Skip the row, record it in the build diagnostics and log a warning
    #[default]
    Skip,
    /// Abort the build with the row's error
    Abort,
}

/// Kit-definition ingest rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct IngestConfig {
    /// The first kit-definition row is a header and is skipped
    pub kits_have_header: bool,
    /// Component keys starting with any of these prefixes are dropped
    pub ignored_component_prefixes: Vec<String>,
    /// Handling of rows with missing keys or too few fields
    pub invalid_rows: InvalidRowPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            kits_have_header: true,
            ignored_component_prefixes: vec![DEFAULT_IGNORED_COMPONENT_PREFIX.to_string()],
            invalid_rows: InvalidRowPolicy::Skip,
        }
    }
}

impl IngestConfig {
    /// Whether a component key is excluded by prefix.
    #[must_use]
    pub fn is_ignored_component(&self, component_key: &str) -> bool {
        self.ignored_component_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && component_key.starts_with(prefix.as_str()))
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Order line-item table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrdersConfig {
    /// Column holding the order/contract id
    pub group_column: usize,
    /// Column holding the item key looked up in the kit graph
    pub item_key_column: usize,
    /// Column holding the ordered quantity
    pub quantity_column: usize,
    /// The first line-item row is a header
    pub has_header: bool,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        let layout = OrderLayout::default();
        Self {
            group_column: layout.group_column,
            item_key_column: layout.item_key_column,
            quantity_column: layout.quantity_column,
            has_header: true,
        }
    }
}

impl OrdersConfig {
    #[must_use]
    pub const fn layout(&self) -> OrderLayout {
        OrderLayout {
            group_column: self.group_column,
            item_key_column: self.item_key_column,
            quantity_column: self.quantity_column,
        }
    }
}

// ============================================================================
// Graph
// ============================================================================

/// Handling of kits that contain themselves, directly or transitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Fail the build with the cycle path
    #[default]
    Reject,
    /// Accept the graph; traversal stops at the edge that closes a cycle
    Break,
}

/// Kit graph construction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GraphConfig {
    pub cycle_policy: CyclePolicy,
}

// ============================================================================
// Matching
// ============================================================================

/// How a line item's key is compared with a reachable component key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum KeyMatchMode {
    /// Case-insensitive substring containment; tolerates decorated keys but
    /// also matches unrelated keys that happen to contain a component key
    #[default]
    Contains,
    /// Case-insensitive equality
    Exact,
}

/// Line-item matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    pub mode: KeyMatchMode,
}

// ============================================================================
// Catalog
// ============================================================================

/// Whole-catalog explosion options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogConfig {
    /// Also explode assemblies that are nested inside other kits
    pub include_child_assemblies: bool,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Worker pool sizing and completion policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Concurrent explosion units (one unit per root assembly or order)
    #[schemars(range(min = 1, max = 256))]
    pub explosion_workers: usize,
    /// Concurrent filter units (one unit per order)
    #[schemars(range(min = 1, max = 256))]
    pub filter_workers: usize,
    /// Stop waiting after this many seconds and return partial results
    pub completion_timeout_secs: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            explosion_workers: DEFAULT_EXPLOSION_WORKERS,
            filter_workers: DEFAULT_FILTER_WORKERS,
            completion_timeout_secs: None,
        }
    }
}

impl SchedulerConfig {
    #[must_use]
    pub fn completion_timeout(&self) -> Option<Duration> {
        self.completion_timeout_secs.map(Duration::from_secs)
    }
}

// ============================================================================
// Output & behavior
// ============================================================================

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    pub format: ReportFormat,
    /// Output file (stdout if not set)
    pub file: Option<PathBuf>,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Input tables for a run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Kit-definition CSV
    pub kits: PathBuf,
    /// Order line-item CSV, for commands that need it
    pub orders: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.ingest.kits_have_header);
        assert_eq!(config.graph.cycle_policy, CyclePolicy::Reject);
        assert_eq!(config.matching.mode, KeyMatchMode::Contains);
        assert_eq!(config.scheduler.explosion_workers, 20);
        assert_eq!(config.scheduler.filter_workers, 5);
        assert!(config.scheduler.completion_timeout().is_none());
        assert_eq!(config.orders.layout(), OrderLayout::default());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .cycle_policy(CyclePolicy::Break)
            .match_mode(KeyMatchMode::Exact)
            .workers(4)
            .completion_timeout_secs(Some(30))
            .quiet(true)
            .build();

        assert_eq!(config.graph.cycle_policy, CyclePolicy::Break);
        assert_eq!(config.matching.mode, KeyMatchMode::Exact);
        assert_eq!(config.scheduler.filter_workers, 4);
        assert_eq!(
            config.scheduler.completion_timeout(),
            Some(Duration::from_secs(30))
        );
        assert!(config.behavior.quiet);
    }

    #[test]
    fn test_ignored_prefixes() {
        let ingest = IngestConfig::default();
        assert!(ingest.is_ignored_component(".NOTE"));
        assert!(!ingest.is_ignored_component("POLE.8"));

        let ingest = IngestConfig {
            ignored_component_prefixes: vec![String::new()],
            ..IngestConfig::default()
        };
        assert!(!ingest.is_ignored_component("anything"));
    }

    #[test]
    fn test_yaml_roundtrip_of_enums() {
        let yaml = "graph:\n  cycle_policy: break\nmatching:\n  mode: exact\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.graph.cycle_policy, CyclePolicy::Break);
        assert_eq!(config.matching.mode, KeyMatchMode::Exact);
        assert!(config.ingest.kits_have_header);
    }
}
