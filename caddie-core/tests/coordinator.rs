use caddie_core::scan::ScanCoordinator;
use caddie_model::{ScanId, ScanOutcome, ScanStatus};
use chrono::Utc;
use tokio::sync::broadcast::error::TryRecvError;

fn outcome(scan_id: ScanId, status: ScanStatus) -> ScanOutcome {
    let now = Utc::now();
    ScanOutcome {
        scan_id,
        status,
        flagged: Vec::new(),
        error: None,
        started_at: now,
        finished_at: now,
    }
}

#[tokio::test]
async fn second_begin_supersedes_the_first() {
    let coordinator = ScanCoordinator::new();

    let first = coordinator.begin();
    let second = coordinator.begin();

    // The superseded scan is asked to stop, the new one is not.
    assert!(first.cancel.is_cancelled());
    assert!(!second.cancel.is_cancelled());

    let snapshot = coordinator.status();
    assert!(snapshot.in_progress);
    assert_eq!(snapshot.scan_id, Some(second.scan_id));

    // The first scan's late completion is a no-op.
    coordinator.complete(first.scan_id, outcome(first.scan_id, ScanStatus::Completed));
    assert!(coordinator.status().last_outcome.is_none());
    assert!(coordinator.status().in_progress);

    coordinator.complete(
        second.scan_id,
        outcome(second.scan_id, ScanStatus::Completed),
    );
    let snapshot = coordinator.status();
    assert!(!snapshot.in_progress);
    assert_eq!(
        snapshot.last_outcome.as_ref().map(|o| o.scan_id),
        Some(second.scan_id)
    );
}

#[tokio::test]
async fn stale_progress_is_dropped_not_relayed() {
    let coordinator = ScanCoordinator::new();
    let mut rx = coordinator.subscribe();

    let first = coordinator.begin();
    let second = coordinator.begin();

    assert!(!coordinator.report_progress(first.scan_id, "late frame", 50.0));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    assert!(coordinator.report_progress(second.scan_id, "live frame", 50.0));
    let frame = rx.try_recv().unwrap();
    assert_eq!(frame.scan_id, second.scan_id);
    assert_eq!(frame.message, "live frame");
    assert_eq!(frame.percent, 50.0);
}

#[tokio::test]
async fn cancel_clears_in_progress_immediately() {
    let coordinator = ScanCoordinator::new();
    let ticket = coordinator.begin();

    assert!(coordinator.cancel());
    assert!(ticket.cancel.is_cancelled());

    let snapshot = coordinator.status();
    assert!(!snapshot.in_progress);
    assert_eq!(snapshot.scan_id, None);

    // Nothing left to cancel, and the cancelled scan's terminal write is
    // discarded by identity.
    assert!(!coordinator.cancel());
    coordinator.complete(ticket.scan_id, outcome(ticket.scan_id, ScanStatus::Cancelled));
    assert!(coordinator.status().last_outcome.is_none());
}

#[tokio::test]
async fn progress_for_current_scan_flows_through() {
    let coordinator = ScanCoordinator::new();
    let ticket = coordinator.begin();
    let mut rx = coordinator.subscribe();

    assert!(coordinator.report_progress(ticket.scan_id, "Fetching club types...", 2.0));
    let frame = rx.try_recv().unwrap();
    assert_eq!(frame.percent, 2.0);

    // Progress after cancellation is stale by definition.
    coordinator.cancel();
    assert!(!coordinator.report_progress(ticket.scan_id, "too late", 99.0));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
