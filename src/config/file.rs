//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".kit-breakout.yaml",
    ".kit-breakout.yml",
    "kit-breakout.yaml",
    "kit-breakout.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/kit-breakout/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("kit-breakout")))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence
    /// wherever it differs from the defaults.
    ///
    /// Used to layer CLI arguments over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.ingest != defaults.ingest {
            self.ingest.clone_from(&other.ingest);
        }
        if other.orders != defaults.orders {
            self.orders.clone_from(&other.orders);
        }
        if other.graph != defaults.graph {
            self.graph.clone_from(&other.graph);
        }
        if other.matching != defaults.matching {
            self.matching.clone_from(&other.matching);
        }
        if other.catalog.include_child_assemblies {
            self.catalog.include_child_assemblies = true;
        }

        if other.scheduler.explosion_workers != defaults.scheduler.explosion_workers {
            self.scheduler.explosion_workers = other.scheduler.explosion_workers;
        }
        if other.scheduler.filter_workers != defaults.scheduler.filter_workers {
            self.scheduler.filter_workers = other.scheduler.filter_workers;
        }
        if other.scheduler.completion_timeout_secs.is_some() {
            self.scheduler.completion_timeout_secs = other.scheduler.completion_timeout_secs;
        }

        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }

        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
    }

    /// Apply flags the user gave explicitly, whatever their value.
    pub fn pin_flags(&mut self, workers: Option<usize>, format: Option<ReportFormat>) {
        if let Some(workers) = workers {
            self.scheduler.explosion_workers = workers;
            self.scheduler.filter_workers = workers;
        }
        if let Some(format) = format {
            self.output.format = format;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        "# kit-breakout configuration\n\
         # Place this file at .kit-breakout.yaml in the working directory or ~/.config/kit-breakout/\n\n{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

// ============================================================================
// Tests
// ============================================================================
