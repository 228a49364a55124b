//! Unified error types for kit-breakout.
//!
//! Structural problems (rows the builder cannot use, cycles the configuration
//! refuses) are typed errors that carry the offending row. Data-quality
//! problems are absorbed with defaults and surface only in diagnostics, and
//! cancellation is a status rather than an error.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for kit-breakout operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KitError {
    /// Errors while building the kit graph from definition rows
    #[error("Kit graph build failed: {context}")]
    Build {
        context: String,
        #[source]
        source: BuildErrorKind,
    },

    /// Errors while reading tabular input
    #[error("Ingest failed: {context}")]
    Ingest {
        context: String,
        #[source]
        source: IngestErrorKind,
    },

    /// Errors while setting up or feeding the worker pool
    #[error("Scheduling failed: {context}")]
    Scheduler {
        context: String,
        #[source]
        source: SchedulerErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// A source row attached to a structural error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffendingRow {
    /// 1-based position in the source table, header included
    pub row_number: usize,
    pub fields: Vec<String>,
}

impl OffendingRow {
    #[must_use]
    pub fn new(row_number: usize, fields: &[String]) -> Self {
        Self {
            row_number,
            fields: fields.to_vec(),
        }
    }
}

impl fmt::Display for OffendingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} [{}]", self.row_number, self.fields.join(", "))
    }
}

/// Specific kit graph build error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildErrorKind {
    #[error("Missing required field '{field}' at {row}")]
    MissingField { field: String, row: OffendingRow },

    #[error("Expected {expected} fields but found {found} at {row}")]
    ShortRow {
        expected: usize,
        found: usize,
        row: OffendingRow,
    },

    #[error("Kit cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}

impl BuildErrorKind {
    /// The offending row, when the error is tied to one.
    #[must_use]
    pub const fn row(&self) -> Option<&OffendingRow> {
        match self {
            Self::MissingField { row, .. } | Self::ShortRow { row, .. } => Some(row),
            Self::Cycle { .. } => None,
        }
    }
}

/// Specific ingest error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IngestErrorKind {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table is empty")]
    EmptyTable,
}

/// Specific scheduler error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SchedulerErrorKind {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),

    #[error("Work unit '{0}' was submitted more than once")]
    DuplicateUnit(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for kit-breakout operations
pub type Result<T> = std::result::Result<T, KitError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl KitError {
    /// Create a build error with context
    pub fn build(context: impl Into<String>, source: BuildErrorKind) -> Self {
        Self::Build {
            context: context.into(),
            source,
        }
    }

    /// Create a build error for a structurally unusable kit row
    pub fn invalid_row(source: BuildErrorKind) -> Self {
        Self::build("invalid kit definition row", source)
    }

    /// Create a build error for a kit cycle
    pub fn cycle(path: Vec<String>) -> Self {
        Self::build("cycle policy is 'reject'", BuildErrorKind::Cycle { path })
    }

    /// Create an ingest error with context
    pub fn ingest(context: impl Into<String>, source: IngestErrorKind) -> Self {
        Self::Ingest {
            context: context.into(),
            source,
        }
    }

    /// Create a scheduler error with context
    pub fn scheduler(context: impl Into<String>, source: SchedulerErrorKind) -> Self {
        Self::Scheduler {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The offending source row of a structural build error.
    #[must_use]
    pub const fn offending_row(&self) -> Option<&OffendingRow> {
        match self {
            Self::Build { source, .. } => source.row(),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for KitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<csv::Error> for KitError {
    fn from(err: csv::Error) -> Self {
        Self::ingest("reading CSV", IngestErrorKind::Csv(err))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The new context is prepended to whatever context the error already
/// carries, so a chain reads outermost first.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<KitError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: KitError, new_ctx: &str) -> KitError {
    match err {
        KitError::Build {
            context: existing,
            source,
        } => KitError::Build {
            context: chain_context(new_ctx, &existing),
            source,
        },
        KitError::Ingest {
            context: existing,
            source,
        } => KitError::Ingest {
            context: chain_context(new_ctx, &existing),
            source,
        },
        KitError::Scheduler {
            context: existing,
            source,
        } => KitError::Scheduler {
            context: chain_context(new_ctx, &existing),
            source,
        },
        KitError::Io {
            path,
            message,
            source,
        } => KitError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        KitError::Config(msg) => KitError::Config(chain_context(new_ctx, &msg)),
        KitError::Validation(msg) => KitError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Returns "`new`: `existing`", or just `new` when nothing exists yet.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> OffendingRow {
        OffendingRow::new(
            7,
            &[
                "KIT-A".to_string(),
                "Kit A".to_string(),
                "10".to_string(),
                "2".to_string(),
                String::new(),
                String::new(),
            ],
        )
    }

    #[test]
    fn test_invalid_row_carries_row() {
        let err = KitError::invalid_row(BuildErrorKind::MissingField {
            field: "component item key".to_string(),
            row: sample_row(),
        });
        let display = err.to_string();
        assert!(display.contains("build"), "unexpected message: {display}");

        let row = err.offending_row().expect("row attached");
        assert_eq!(row.row_number, 7);
        assert_eq!(row.fields[0], "KIT-A");
    }

    #[test]
    fn test_cycle_display_lists_path() {
        let kind = BuildErrorKind::Cycle {
            path: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(kind.to_string(), "Kit cycle detected: A -> B -> A");
        assert!(kind.row().is_none());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = KitError::io("/data/kits.csv", io_err);
        assert!(err.to_string().contains("/data/kits.csv"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(KitError::cycle(vec!["A".into(), "A".into()]))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(KitError::Build { context, .. }) => {
                assert!(context.starts_with("outer layer: middle layer"), "{context}");
                assert!(context.contains("reject"), "{context}");
            }
            other => panic!("Expected Build error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called);

        let err_result: Result<i32> = Err(KitError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called);
    }

    #[test]
    fn test_config_and_validation_context() {
        let err: Result<()> = Err(KitError::config("scheduler.filter_workers: out of range"));
        match err.context("loading settings") {
            Err(KitError::Config(msg)) => {
                assert_eq!(msg, "loading settings: scheduler.filter_workers: out of range");
            }
            other => panic!("Expected Config error, got {other:?}"),
        }

        let err = KitError::validation("paths.kits: File not found");
        assert_eq!(err.to_string(), "Validation failed: paths.kits: File not found");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
