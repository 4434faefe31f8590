use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{PlayerId, ScanId, ScorecardId};

/// A shot whose measured distance fell outside the expected range for the
/// club that recorded it.
///
/// Derived output only; flagged shots live in the result accumulator of one
/// scan and are never persisted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedShot {
    pub scorecard_id: ScorecardId,
    pub scorecard_date: String,
    pub course_name: Option<String>,
    pub hole_number: u32,
    pub club_name: String,
    pub meters: Option<f64>,
    pub shot_order: u32,
    pub player_profile_id: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanStatus::Completed | ScanStatus::Failed | ScanStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Pending => "pending",
            ScanStatus::Running => "running",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
            ScanStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One progress frame emitted by a running scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub scan_id: ScanId,
    pub message: String,
    pub percent: f32,
}

impl ScanProgress {
    pub fn new(scan_id: ScanId, message: impl Into<String>, percent: f32) -> Self {
        ScanProgress {
            scan_id,
            message: message.into(),
            percent,
        }
    }
}

/// Terminal record for one finished (or aborted) scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub scan_id: ScanId,
    pub status: ScanStatus,
    pub flagged: Vec<FlaggedShot>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Point-in-time answer to a status query; safe to request at any moment,
/// including while a scan is running.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub in_progress: bool,
    pub scan_id: Option<ScanId>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<ScanOutcome>,
}
