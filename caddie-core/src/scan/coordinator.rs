use std::sync::Mutex;

use caddie_model::{ScanId, ScanOutcome, ScanProgress, ScanSnapshot};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::scan::pipeline::ProgressReporter;

const PROGRESS_CHANNEL_CAPACITY: usize = 256;

/// Everything a pipeline run needs to identify itself to the coordinator.
#[derive(Debug, Clone)]
pub struct ScanTicket {
    pub scan_id: ScanId,
    pub cancel: CancellationToken,
}

struct CurrentScan {
    scan_id: ScanId,
    cancel: CancellationToken,
    started_at: DateTime<Utc>,
}

struct CoordinatorState {
    current: Option<CurrentScan>,
    last_outcome: Option<ScanOutcome>,
}

/// Process-wide single-slot scan registry.
///
/// The driving consumer (a CLI invocation, a UI) can be torn down and
/// recreated while a scan is still running, so scan state lives here and is
/// queried by identity. No lock exists between two scans: a superseded scan
/// keeps running until its next checkpoint, and every externally visible
/// write it attempts is rejected by a "still current?" comparison on the
/// scan id.
pub struct ScanCoordinator {
    state: Mutex<CoordinatorState>,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl std::fmt::Debug for ScanCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.status();
        f.debug_struct("ScanCoordinator")
            .field("in_progress", &snapshot.in_progress)
            .field("scan_id", &snapshot.scan_id)
            .finish()
    }
}

impl Default for ScanCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanCoordinator {
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_CAPACITY);
        ScanCoordinator {
            state: Mutex::new(CoordinatorState {
                current: None,
                last_outcome: None,
            }),
            progress_tx,
        }
    }

    /// Allocate a fresh scan id and make it current, superseding whatever was
    /// current before. The superseded scan's token is cancelled so it halts at
    /// its next checkpoint; its in-flight fetch is never aborted.
    pub fn begin(&self) -> ScanTicket {
        let ticket = ScanTicket {
            scan_id: ScanId::new(),
            cancel: CancellationToken::new(),
        };

        let mut state = self.state.lock().expect("coordinator lock poisoned");
        if let Some(previous) = state.current.take() {
            info!(superseded = %previous.scan_id, current = %ticket.scan_id, "scan superseded");
            previous.cancel.cancel();
        }
        state.current = Some(CurrentScan {
            scan_id: ticket.scan_id,
            cancel: ticket.cancel.clone(),
            started_at: Utc::now(),
        });

        ticket
    }

    /// Relay one progress frame to subscribers. Returns false, asking the
    /// pipeline to stop, when the scan id is no longer current; stale frames
    /// are dropped, not relayed.
    pub fn report_progress(&self, scan_id: ScanId, message: &str, percent: f32) -> bool {
        {
            let state = self.state.lock().expect("coordinator lock poisoned");
            if !is_current(&state, scan_id) {
                debug!(%scan_id, "dropping progress from superseded scan");
                return false;
            }
        }

        // Nobody listening is fine; frames are fire-and-forget.
        let _ = self
            .progress_tx
            .send(ScanProgress::new(scan_id, message, percent));
        true
    }

    /// Record a terminal outcome, but only if the scan is still current;
    /// otherwise the outcome is silently discarded.
    pub fn complete(&self, scan_id: ScanId, outcome: ScanOutcome) {
        let mut state = self.state.lock().expect("coordinator lock poisoned");
        if !is_current(&state, scan_id) {
            debug!(%scan_id, "discarding outcome from superseded scan");
            return;
        }

        info!(%scan_id, status = %outcome.status, flagged = outcome.flagged.len(), "scan finalized");
        state.current = None;
        state.last_outcome = Some(outcome);
    }

    /// Cancel the current scan, clearing in-progress immediately. Cooperative
    /// and eventual: the pipeline only notices at its next checkpoint. Returns
    /// false when nothing was running.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock().expect("coordinator lock poisoned");
        match state.current.take() {
            Some(current) => {
                info!(scan_id = %current.scan_id, "scan cancelled");
                current.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Point-in-time read; safe while a scan is running.
    pub fn status(&self) -> ScanSnapshot {
        let state = self.state.lock().expect("coordinator lock poisoned");
        ScanSnapshot {
            in_progress: state.current.is_some(),
            scan_id: state.current.as_ref().map(|current| current.scan_id),
            started_at: state.current.as_ref().map(|current| current.started_at),
            last_outcome: state.last_outcome.clone(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }
}

fn is_current(state: &CoordinatorState, scan_id: ScanId) -> bool {
    state
        .current
        .as_ref()
        .is_some_and(|current| current.scan_id == scan_id)
}

/// [`ProgressReporter`] that routes a pipeline's frames through the
/// coordinator's identity check.
pub struct CoordinatedReporter {
    coordinator: std::sync::Arc<ScanCoordinator>,
    scan_id: ScanId,
}

impl CoordinatedReporter {
    pub fn new(coordinator: std::sync::Arc<ScanCoordinator>, scan_id: ScanId) -> Self {
        CoordinatedReporter {
            coordinator,
            scan_id,
        }
    }
}

impl std::fmt::Debug for CoordinatedReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatedReporter")
            .field("scan_id", &self.scan_id)
            .finish()
    }
}

impl ProgressReporter for CoordinatedReporter {
    fn report(&self, message: &str, percent: f32) -> bool {
        self.coordinator
            .report_progress(self.scan_id, message, percent)
    }
}
