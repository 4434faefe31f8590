use std::sync::Arc;
use std::time::Duration;

use caddie_model::{OverrideRanges, ScanId, ScanOutcome, ScanProgress, ScanSnapshot, ScanStatus};
use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::error::{CaddieError, Result};
use crate::gateway::GolfApi;
use crate::overrides::OverrideStore;
use crate::scan::coordinator::{CoordinatedReporter, ScanCoordinator};
use crate::scan::pipeline;

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

const COMMAND_CHANNEL_CAPACITY: usize = 16;
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Acknowledgement that a scan was accepted and spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartAck {
    pub scan_id: ScanId,
}

/// One request across the relay boundary. Every variant carries its own reply
/// channel; replies are matched to requests by that channel, results to scans
/// by scan id.
#[derive(Debug)]
pub enum ScanCommand {
    Start {
        reply: oneshot::Sender<StartAck>,
    },
    Cancel {
        reply: oneshot::Sender<bool>,
    },
    Status {
        reply: oneshot::Sender<ScanSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<broadcast::Receiver<ScanProgress>>,
    },
}

/// The consumer's view of the scan service: cloneable, cheap, usable from a
/// short-lived context while the service itself lives on.
///
/// Every reply wait is bounded: a dropped reply surfaces as
/// [`CaddieError::RelayTimeout`] instead of hanging the caller forever.
#[derive(Clone)]
pub struct ScanServiceHandle {
    tx: mpsc::Sender<ScanCommand>,
    reply_timeout: Duration,
}

impl std::fmt::Debug for ScanServiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanServiceHandle")
            .field("reply_timeout", &self.reply_timeout)
            .finish()
    }
}

impl ScanServiceHandle {
    /// Wrap a raw command channel. Mostly useful for tests and custom service
    /// loops; normal construction goes through [`ScanService::spawn`].
    pub fn new(tx: mpsc::Sender<ScanCommand>, reply_timeout: Duration) -> Self {
        ScanServiceHandle { tx, reply_timeout }
    }

    pub async fn start(&self) -> Result<StartAck> {
        self.request(|reply| ScanCommand::Start { reply }).await
    }

    /// Returns false when there was nothing to cancel.
    pub async fn cancel(&self) -> Result<bool> {
        self.request(|reply| ScanCommand::Cancel { reply }).await
    }

    pub async fn status(&self) -> Result<ScanSnapshot> {
        self.request(|reply| ScanCommand::Status { reply }).await
    }

    pub async fn subscribe(&self) -> Result<broadcast::Receiver<ScanProgress>> {
        self.request(|reply| ScanCommand::Subscribe { reply }).await
    }

    /// Poll status until no scan is in progress, bounded by `deadline`.
    /// Completion is only ever observed this way; the start request never
    /// blocks until the scan ends.
    pub async fn wait_until_idle(&self, deadline: Duration) -> Result<ScanSnapshot> {
        let poll = async {
            loop {
                let snapshot = self.status().await?;
                if !snapshot.in_progress {
                    return Ok(snapshot);
                }
                tokio::time::sleep(IDLE_POLL_INTERVAL).await;
            }
        };

        timeout(deadline, poll)
            .await
            .map_err(|_| CaddieError::RelayTimeout)?
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ScanCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| CaddieError::ServiceUnavailable)?;

        timeout(self.reply_timeout, reply_rx)
            .await
            .map_err(|_| CaddieError::RelayTimeout)?
            .map_err(|_| CaddieError::ServiceUnavailable)
    }
}

/// Long-lived owner of the coordinator and the gateway; serves commands until
/// every handle is dropped.
pub struct ScanService {
    gateway: Arc<dyn GolfApi>,
    overrides: Arc<OverrideStore>,
    coordinator: Arc<ScanCoordinator>,
    rx: mpsc::Receiver<ScanCommand>,
}

impl std::fmt::Debug for ScanService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanService")
            .field("coordinator", &self.coordinator)
            .finish()
    }
}

impl ScanService {
    pub fn spawn(
        gateway: Arc<dyn GolfApi>,
        overrides: Arc<OverrideStore>,
        reply_timeout: Duration,
    ) -> (ScanServiceHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let service = ScanService {
            gateway,
            overrides,
            coordinator: Arc::new(ScanCoordinator::new()),
            rx,
        };

        let task = tokio::spawn(service.run());
        (ScanServiceHandle::new(tx, reply_timeout), task)
    }

    async fn run(mut self) {
        info!("scan service started");
        while let Some(command) = self.rx.recv().await {
            match command {
                ScanCommand::Start { reply } => {
                    let ack = self.start_scan();
                    let _ = reply.send(ack);
                }
                ScanCommand::Cancel { reply } => {
                    let _ = reply.send(self.coordinator.cancel());
                }
                ScanCommand::Status { reply } => {
                    let _ = reply.send(self.coordinator.status());
                }
                ScanCommand::Subscribe { reply } => {
                    let _ = reply.send(self.coordinator.subscribe());
                }
            }
        }
        info!("scan service stopped");
    }

    fn start_scan(&self) -> StartAck {
        // The override snapshot is taken here, once; the running scan never
        // observes later edits.
        let overrides = match self.overrides.load() {
            Ok(overrides) => overrides,
            Err(err) => {
                warn!(error = %err, "override store unreadable, scanning without overrides");
                OverrideRanges::new()
            }
        };

        let ticket = self.coordinator.begin();
        let scan_id = ticket.scan_id;
        info!(%scan_id, overrides = overrides.len(), "scan accepted");

        let gateway = Arc::clone(&self.gateway);
        let coordinator = Arc::clone(&self.coordinator);
        tokio::spawn(async move {
            let started_at = Utc::now();
            let reporter = CoordinatedReporter::new(Arc::clone(&coordinator), scan_id);

            let outcome = match pipeline::run_scan(
                gateway.as_ref(),
                &overrides,
                &reporter,
                &ticket.cancel,
            )
            .await
            {
                Ok(flagged) => {
                    let status = if ticket.cancel.is_cancelled() {
                        ScanStatus::Cancelled
                    } else {
                        ScanStatus::Completed
                    };
                    ScanOutcome {
                        scan_id,
                        status,
                        flagged,
                        error: None,
                        started_at,
                        finished_at: Utc::now(),
                    }
                }
                Err(err) => {
                    error!(%scan_id, error = %err, "scan failed");
                    ScanOutcome {
                        scan_id,
                        status: ScanStatus::Failed,
                        flagged: Vec::new(),
                        error: Some(err.to_string()),
                        started_at,
                        finished_at: Utc::now(),
                    }
                }
            };

            // Discarded by identity if this scan was superseded or cancelled
            // while we were running.
            coordinator.complete(scan_id, outcome);
        });

        StartAck { scan_id }
    }
}
