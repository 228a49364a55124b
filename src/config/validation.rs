//! Configuration validation for kit-breakout.

use super::defaults::MAX_WORKERS;
use super::types::{AppConfig, OrdersConfig, OutputConfig, RunPaths, SchedulerConfig};
use crate::error::{KitError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

fn joined(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppConfig {
    /// Consume the configuration, failing with every validation error joined.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(KitError::config(joined(&errors)))
        }
    }
}

impl RunPaths {
    /// Fail on the first unusable input path.
    pub fn ensure_valid(&self) -> Result<()> {
        match self.validate().first() {
            Some(first) => Err(KitError::validation(format!("invalid input: {first}"))),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.orders.validate());
        errors.extend(self.scheduler.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for OrdersConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let columns = [
            ("orders.group_column", self.group_column),
            ("orders.item_key_column", self.item_key_column),
            ("orders.quantity_column", self.quantity_column),
        ];
        for (i, (field, column)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[..i].iter().find(|(_, c)| c == column) {
                errors.push(ConfigError {
                    field: (*field).to_string(),
                    message: format!("Column {column} is already used by {other}"),
                });
            }
        }
        errors
    }
}

impl Validatable for SchedulerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, workers) in [
            ("scheduler.explosion_workers", self.explosion_workers),
            ("scheduler.filter_workers", self.filter_workers),
        ] {
            if !(1..=MAX_WORKERS).contains(&workers) {
                errors.push(ConfigError {
                    field: field.to_string(),
                    message: format!("Worker count must be between 1 and {MAX_WORKERS}, got {workers}"),
                });
            }
        }

        if self.completion_timeout_secs == Some(0) {
            errors.push(ConfigError {
                field: "scheduler.completion_timeout_secs".to_string(),
                message: "Timeout must be at least 1 second (omit it to wait indefinitely)"
                    .to_string(),
            });
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "output.file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        errors
    }
}

impl Validatable for RunPaths {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.kits.exists() {
            errors.push(ConfigError {
                field: "paths.kits".to_string(),
                message: format!("File not found: {}", self.kits.display()),
            });
        }
        if let Some(ref orders) = self.orders {
            if !orders.exists() {
                errors.push(ConfigError {
                    field: "paths.orders".to_string(),
                    message: format!("File not found: {}", orders.display()),
                });
            }
        }
        errors
    }
}
