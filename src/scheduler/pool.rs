//! Bounded worker pool for independent units of work.

use super::cancel::{CancellationToken, Outcome};
use super::progress::{ProgressEvent, ProgressObserver, ProgressTracker};
use super::store::ResultStore;
use crate::error::{KitError, Result, SchedulerErrorKind};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// One independently schedulable piece of work.
///
/// `key` is the group id the unit's results are stored under; each key may
/// be submitted once per run so that one worker owns each bucket.
#[derive(Debug, Clone)]
pub struct WorkUnit<U> {
    pub key: String,
    pub payload: U,
}

impl<U> WorkUnit<U> {
    pub fn new(key: impl Into<String>, payload: U) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }
}

/// Recoverable conditions that ended a run before every unit reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerWarning {
    /// The completion timeout expired; cancellation was requested
    CompletionTimeout { waited: Duration, outstanding: usize },
    /// Every worker went away without reporting, e.g. after a panic
    WorkersLost { outstanding: usize },
}

impl fmt::Display for SchedulerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletionTimeout {
                waited,
                outstanding,
            } => write!(
                f,
                "completion timeout after {}s with {outstanding} unit(s) outstanding",
                waited.as_secs_f64()
            ),
            Self::WorkersLost { outstanding } => {
                write!(f, "workers stopped with {outstanding} unit(s) unreported")
            }
        }
    }
}

/// Aggregated outcome of a scheduler run.
#[derive(Debug, Clone)]
pub struct SchedulerReport<T> {
    /// Results per unit key, in submission order
    pub results: IndexMap<String, Vec<T>>,
    pub completed: usize,
    pub cancelled: usize,
    pub total: usize,
    pub warning: Option<SchedulerWarning>,
}

impl<T> SchedulerReport<T> {
    /// Every unit ran to completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed == self.total && self.warning.is_none()
    }

    /// All stored values, unit by unit.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.results.values().flatten()
    }
}

/// A dedicated thread pool with a fixed number of workers.
///
/// Units run concurrently, each wholly on one worker. The submitting thread
/// blocks while it aggregates progress, until every unit has reported or the
/// optional completion timeout expires.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    label: String,
    workers: usize,
    completion_timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("label", &self.label)
            .field("workers", &self.workers)
            .field("completion_timeout", &self.completion_timeout)
            .finish_non_exhaustive()
    }
}

impl WorkerPool {
    /// Create a pool of `workers` threads named `<label>-<n>`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerErrorKind::PoolBuild`] if the threads cannot be
    /// started.
    pub fn new(label: impl Into<String>, workers: usize) -> Result<Self> {
        let label = label.into();
        let workers = workers.max(1);
        let thread_prefix = label.clone();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |index| format!("{thread_prefix}-{index}"))
            .panic_handler(|_| error!("Worker panicked; its unit is abandoned"))
            .build()
            .map_err(|e| {
                KitError::scheduler(
                    "creating worker pool",
                    SchedulerErrorKind::PoolBuild(e.to_string()),
                )
            })?;

        Ok(Self {
            pool,
            label,
            workers,
            completion_timeout: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Stop waiting after `timeout` and return partial results.
    #[must_use]
    pub const fn with_completion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Share an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token polled by this pool's workers.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` over every unit and collect the values each unit returns.
    ///
    /// A unit that completes has its values appended to the result store in
    /// one step; a cancelled unit stores nothing. Units never share a key, so
    /// per-group order is exactly the order `work` produced.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerErrorKind::DuplicateUnit`] before anything runs if
    /// two units share a key. Timeouts and cancellation are not errors; they
    /// are reported through [`SchedulerReport`].
    pub fn run_units<U, T, F>(
        &self,
        units: Vec<WorkUnit<U>>,
        work: F,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<SchedulerReport<T>>
    where
        U: Send + 'static,
        T: Send + 'static,
        F: Fn(&WorkUnit<U>, &CancellationToken) -> Outcome<Vec<T>> + Send + Sync + 'static,
    {
        let mut keys = IndexSet::with_capacity(units.len());
        for unit in &units {
            if !keys.insert(unit.key.clone()) {
                return Err(KitError::scheduler(
                    format!("submitting {} units", self.label),
                    SchedulerErrorKind::DuplicateUnit(unit.key.clone()),
                ));
            }
        }
        let order: Vec<String> = keys.into_iter().collect();

        let total = units.len();
        let store = Arc::new(ResultStore::new());
        let work = Arc::new(work);
        let (tx, rx) = mpsc::channel();

        for unit in units {
            let tx = tx.clone();
            let store = Arc::clone(&store);
            let work = Arc::clone(&work);
            let cancel = self.cancel.clone();
            self.pool.spawn(move || {
                let event = if cancel.is_cancelled() {
                    ProgressEvent::Cancelled { key: unit.key }
                } else {
                    debug!(unit = %unit.key, "Unit started");
                    match work(&unit, &cancel) {
                        Outcome::Completed(values) => {
                            store.append(&unit.key, values);
                            debug!(unit = %unit.key, "Unit finished");
                            ProgressEvent::Completed { key: unit.key }
                        }
                        Outcome::Cancelled => {
                            debug!(unit = %unit.key, "Unit cancelled");
                            ProgressEvent::Cancelled { key: unit.key }
                        }
                    }
                };
                // The receiver is gone only if the run already gave up waiting.
                let _ = tx.send(event);
            });
        }
        drop(tx);

        let mut tracker = ProgressTracker::new(total);
        let started = Instant::now();
        let deadline = self.completion_timeout.map(|timeout| started + timeout);
        let mut warning = None;

        while !tracker.is_finished() {
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(event) => {
                    tracker.record(&event);
                    if let Some(observer) = observer {
                        observer.on_progress(&tracker.snapshot());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    let waited = started.elapsed();
                    warn!(
                        task = %self.label,
                        outstanding = tracker.outstanding(),
                        "Completion timeout reached; cancelling outstanding units"
                    );
                    self.cancel.cancel();
                    warning = Some(SchedulerWarning::CompletionTimeout {
                        waited,
                        outstanding: tracker.outstanding(),
                    });
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(
                        task = %self.label,
                        outstanding = tracker.outstanding(),
                        "Workers stopped before reporting every unit"
                    );
                    warning = Some(SchedulerWarning::WorkersLost {
                        outstanding: tracker.outstanding(),
                    });
                    break;
                }
            }
        }

        if self.cancel.is_cancelled() && warning.is_none() {
            warn!(task = %self.label, cancelled = tracker.snapshot().cancelled, "Run was cancelled");
        }

        let progress = tracker.snapshot();
        Ok(SchedulerReport {
            results: store.take_ordered(&order),
            completed: progress.completed,
            cancelled: progress.cancelled,
            total,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_results_follow_submission_order() {
        let pool = WorkerPool::new("test", 4).unwrap();
        let units: Vec<_> = (0..20).map(|n| WorkUnit::new(format!("g{n:02}"), n)).collect();

        let report = pool
            .run_units(
                units,
                |unit: &WorkUnit<i32>, _cancel: &CancellationToken| {
                    Outcome::Completed(vec![unit.payload, unit.payload * 10])
                },
                None,
            )
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.completed, 20);
        let keys: Vec<_> = report.results.keys().cloned().collect();
        let expected: Vec<_> = (0..20).map(|n| format!("g{n:02}")).collect();
        assert_eq!(keys, expected);
        assert_eq!(report.results["g07"], vec![7, 70]);
    }

    #[test]
    fn test_duplicate_unit_is_rejected() {
        let pool = WorkerPool::new("test", 2).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ran);

        let err = pool
            .run_units(
                vec![WorkUnit::new("same", ()), WorkUnit::new("same", ())],
                move |_: &WorkUnit<()>, _: &CancellationToken| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Outcome::Completed(vec![()])
                },
                None,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            KitError::Scheduler {
                source: SchedulerErrorKind::DuplicateUnit(ref key),
                ..
            } if key == "same"
        ));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pre_cancelled_run_stores_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let pool = WorkerPool::new("test", 2).unwrap().with_cancellation(cancel);

        let report = pool
            .run_units(
                vec![WorkUnit::new("a", 1), WorkUnit::new("b", 2)],
                |unit: &WorkUnit<i32>, _: &CancellationToken| Outcome::Completed(vec![unit.payload]),
                None,
            )
            .unwrap();

        assert_eq!(report.cancelled, 2);
        assert!(report.results.is_empty());
        assert!(!report.is_complete());
        assert!(report.warning.is_none());
    }

    #[test]
    fn test_empty_run() {
        let pool = WorkerPool::new("test", 1).unwrap();
        let report = pool
            .run_units(
                Vec::<WorkUnit<()>>::new(),
                |_: &WorkUnit<()>, _: &CancellationToken| Outcome::Completed(Vec::<u8>::new()),
                None,
            )
            .unwrap();
        assert!(report.is_complete());
        assert_eq!(report.total, 0);
    }
}
