//! Concurrency scheduler.
//!
//! Runs explosion units (one per root assembly or order) and filter units
//! (one per order) on a bounded [`WorkerPool`]. Workers share the frozen kit
//! graph read-only and hand finished units to a [`ResultStore`]; progress
//! flows back over a channel to the submitting thread.

mod cancel;
mod pool;
mod progress;
mod store;

pub use cancel::{CancellationToken, Outcome};
pub use pool::{SchedulerReport, SchedulerWarning, WorkUnit, WorkerPool};
pub use progress::{LogProgress, Progress, ProgressEvent, ProgressObserver, ProgressTracker};
pub use store::ResultStore;
