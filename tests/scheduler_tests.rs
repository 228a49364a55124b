//! Worker pool integration tests: progress, cancellation and the completion
//! timeout.

use kit_breakout::scheduler::{
    CancellationToken, Outcome, Progress, ProgressObserver, SchedulerWarning, WorkUnit,
    WorkerPool,
};
use std::cell::RefCell;
use std::thread;
use std::time::Duration;

fn units(count: usize) -> Vec<WorkUnit<usize>> {
    (0..count).map(|n| WorkUnit::new(format!("unit-{n:02}"), n)).collect()
}

#[test]
fn progress_is_monotonic_and_ends_at_one() {
    let pool = WorkerPool::new("progress", 3).expect("pool builds");
    let seen = RefCell::new(Vec::new());
    let record = |progress: &Progress| seen.borrow_mut().push(progress.fraction);
    let observer: &dyn ProgressObserver = &record;

    let report = pool
        .run_units(
            units(12),
            |unit: &WorkUnit<usize>, _: &CancellationToken| {
                thread::sleep(Duration::from_millis(2));
                Outcome::Completed(vec![unit.payload])
            },
            Some(observer),
        )
        .expect("run succeeds");

    assert!(report.is_complete());
    let fractions = seen.into_inner();
    assert_eq!(fractions.len(), 12);
    assert!(fractions.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));
    assert_eq!(fractions.last().copied(), Some(1.0));
}

#[test]
fn each_unit_keeps_its_own_row_order() {
    let pool = WorkerPool::new("order", 4).expect("pool builds");
    let report = pool
        .run_units(
            units(16),
            |unit: &WorkUnit<usize>, _: &CancellationToken| {
                Outcome::Completed((0..50).map(|row| unit.payload * 1000 + row).collect())
            },
            None,
        )
        .expect("run succeeds");

    for (n, (key, rows)) in report.results.iter().enumerate() {
        assert_eq!(key, &format!("unit-{n:02}"));
        let expected: Vec<usize> = (0..50).map(|row| n * 1000 + row).collect();
        assert_eq!(rows, &expected);
    }
}

#[test]
fn cancellation_from_observer_stops_remaining_units() {
    let pool = WorkerPool::new("cancel", 1).expect("pool builds");
    let cancel = pool.cancellation_token();
    let stop = |_: &Progress| cancel.cancel();
    let observer: &dyn ProgressObserver = &stop;

    let report = pool
        .run_units(
            units(10),
            |unit: &WorkUnit<usize>, token: &CancellationToken| {
                thread::sleep(Duration::from_millis(20));
                if token.is_cancelled() {
                    return Outcome::Cancelled;
                }
                Outcome::Completed(vec![unit.payload])
            },
            Some(observer),
        )
        .expect("run succeeds");

    assert!(report.completed >= 1);
    assert!(report.cancelled >= 1);
    assert_eq!(report.completed + report.cancelled, report.total);
    assert_eq!(report.results.len(), report.completed);
    assert!(!report.is_complete());
    assert!(report.warning.is_none());
}

#[test]
fn completion_timeout_returns_partial_results_with_warning() {
    let pool = WorkerPool::new("timeout", 2)
        .expect("pool builds")
        .with_completion_timeout(Some(Duration::from_millis(200)));

    let report = pool
        .run_units(
            vec![WorkUnit::new("fast", false), WorkUnit::new("slow", true)],
            |unit: &WorkUnit<bool>, token: &CancellationToken| {
                if unit.payload {
                    while !token.is_cancelled() {
                        thread::sleep(Duration::from_millis(5));
                    }
                    return Outcome::Cancelled;
                }
                Outcome::Completed(vec![unit.key.clone()])
            },
            None,
        )
        .expect("run succeeds");

    assert!(matches!(
        report.warning,
        Some(SchedulerWarning::CompletionTimeout { outstanding: 1, .. })
    ));
    assert_eq!(report.completed, 1);
    assert_eq!(report.results["fast"], vec!["fast".to_string()]);
    assert!(!report.results.contains_key("slow"));
    assert!(pool.cancellation_token().is_cancelled());
}
