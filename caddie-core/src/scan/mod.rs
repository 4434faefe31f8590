//! The scan pipeline and its coordination protocol.
//!
//! One scan is a single logical task: reference build, scorecard enumeration,
//! strictly sequential per-scorecard detail fetches. At most one scan is
//! "current" process-wide; starting a new one supersedes the old by identity,
//! never by force: a superseded scan finishes its in-flight fetch, notices at
//! its next checkpoint, and has its late writes discarded.

pub mod coordinator;
pub mod pipeline;
pub mod service;

pub use coordinator::{CoordinatedReporter, ScanCoordinator, ScanTicket};
pub use pipeline::{INTER_SCORECARD_DELAY, ProgressReporter, SilentReporter, run_scan};
pub use service::{
    DEFAULT_REPLY_TIMEOUT, ScanCommand, ScanService, ScanServiceHandle, StartAck,
};
