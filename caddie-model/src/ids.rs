use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Strongly typed id for a club *type* (the taxonomy entry, e.g. "Driver").
///
/// Ids are assigned by the remote service and are stable but not necessarily
/// contiguous.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClubTypeId(pub i64);

impl ClubTypeId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ClubTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed id for one concrete club owned by a player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClubId(pub i64);

impl ClubId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ClubId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed id for a scorecard (one recorded round).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScorecardId(pub i64);

impl ScorecardId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ScorecardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed id for a player profile on the remote service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl PlayerId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed id for one scan run.
///
/// v7 uuids so ids sort by creation time, which makes supersede ordering easy
/// to read in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanId(pub Uuid);

impl ScanId {
    pub fn new() -> Self {
        ScanId(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ScanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
