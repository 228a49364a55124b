//! Progress reporting by message passing.
//!
//! Workers send one [`ProgressEvent`] per unit over a channel; the thread that
//! submitted the work folds them into a [`ProgressTracker`] and notifies a
//! [`ProgressObserver`]. Business logic never touches the observer.

use serde::Serialize;

/// Emitted by a worker when it finishes a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The unit ran to completion and its results are in the store
    Completed { key: String },
    /// The unit observed cancellation and stored nothing
    Cancelled { key: String },
}

/// Point-in-time view of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub cancelled: usize,
    pub total: usize,
    /// `completed / total`, or 1.0 for an empty run
    pub fraction: f64,
}

/// Aggregates worker events into a monotonically non-decreasing fraction.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    completed: usize,
    cancelled: usize,
}

impl ProgressTracker {
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            cancelled: 0,
        }
    }

    /// Fold one event into the counts. Events beyond `total` are ignored.
    pub fn record(&mut self, event: &ProgressEvent) {
        if self.is_finished() {
            return;
        }
        match event {
            ProgressEvent::Completed { .. } => self.completed += 1,
            ProgressEvent::Cancelled { .. } => self.cancelled += 1,
        }
    }

    /// Whether every submitted unit has reported back.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.completed + self.cancelled >= self.total
    }

    #[must_use]
    pub const fn outstanding(&self) -> usize {
        self.total.saturating_sub(self.completed + self.cancelled)
    }

    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Progress {
        Progress {
            completed: self.completed,
            cancelled: self.cancelled,
            total: self.total,
            fraction: self.fraction(),
        }
    }
}

/// Receives progress updates on the submitting thread.
pub trait ProgressObserver {
    fn on_progress(&self, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&Progress),
{
    fn on_progress(&self, progress: &Progress) {
        self(progress);
    }
}

/// Logs progress through `tracing` in steps of roughly ten percent.
#[derive(Debug)]
pub struct LogProgress {
    label: &'static str,
    last_decile: std::cell::Cell<u32>,
}

impl LogProgress {
    #[must_use]
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            last_decile: std::cell::Cell::new(0),
        }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&self, progress: &Progress) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let decile = (progress.fraction * 10.0).floor() as u32;
        if decile > self.last_decile.get() {
            self.last_decile.set(decile);
            tracing::info!(
                task = self.label,
                completed = progress.completed,
                total = progress.total,
                "{}% done",
                decile * 10
            );
        }
    }
}
