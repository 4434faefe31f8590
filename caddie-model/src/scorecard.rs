use serde::{Deserialize, Serialize};

use crate::ids::{ClubId, PlayerId, ScorecardId};

/// Summary row for one recorded round.
///
/// `start_date` is the service's ISO-8601 string, passed through opaquely; the
/// remote format is not normative and is only parsed best-effort for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorecardSummary {
    pub id: ScorecardId,
    pub start_date: String,
    pub course_name: Option<String>,
}

/// Per-hole shot detail for one scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardDetail {
    pub hole_shots: Vec<HoleShots>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleShots {
    pub hole_number: u32,
    pub shots: Vec<Shot>,
}

/// One recorded shot. `meters == None` means the distance was never measured;
/// such shots are never flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub club_id: ClubId,
    pub shot_order: u32,
    pub meters: Option<f64>,
    pub player_profile_id: PlayerId,
}
