//! Configuration module for kit-breakout.
//!
//! This module provides:
//! - Type-safe configuration structures, one section per component
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.kit-breakout.yaml` file in the working directory or
//! `~/.config/kit-breakout/`:
//!
//! ```yaml
//! orders:
//!   group_column: 0
//!   item_key_column: 21
//!   quantity_column: 22
//! graph:
//!   cycle_policy: reject
//! scheduler:
//!   explosion_workers: 20
//!   filter_workers: 5
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_EXPLOSION_WORKERS, DEFAULT_FILTER_WORKERS, DEFAULT_IGNORED_COMPONENT_PREFIX,
    MAX_WORKERS,
};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CatalogConfig, CyclePolicy, GraphConfig,
    IngestConfig, InvalidRowPolicy, KeyMatchMode, MatchingConfig, OrdersConfig, OutputConfig,
    RunPaths, SchedulerConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
