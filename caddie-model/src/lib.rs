//! Core data model definitions shared across caddie crates.

pub mod club;
pub mod envelope;
pub mod ids;
pub mod scan;
pub mod scorecard;

// Intentionally curated re-exports for downstream consumers.
pub use club::{Club, ClubReport, ClubType};
pub use envelope::{ClubOverride, DistanceEnvelope, OverrideRanges};
pub use ids::{ClubId, ClubTypeId, PlayerId, ScanId, ScorecardId};
pub use scan::{FlaggedShot, ScanOutcome, ScanProgress, ScanSnapshot, ScanStatus};
pub use scorecard::{HoleShots, ScorecardDetail, ScorecardSummary, Shot};
