use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::ClubId;

/// Admissible distance range for a club category, in meters.
///
/// An absent bound is unconstrained on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceEnvelope {
    pub min_meters: Option<f64>,
    pub max_meters: Option<f64>,
}

impl DistanceEnvelope {
    pub const fn max_only(max_meters: f64) -> Self {
        DistanceEnvelope {
            min_meters: None,
            max_meters: Some(max_meters),
        }
    }

    pub const fn bounded(min_meters: f64, max_meters: f64) -> Self {
        DistanceEnvelope {
            min_meters: Some(min_meters),
            max_meters: Some(max_meters),
        }
    }
}

/// A user-supplied ceiling for one specific club.
///
/// Overrides are max-only: the service's users calibrate against too-long
/// readings, and a present override replaces the built-in envelope entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClubOverride {
    pub max_meters: f64,
}

/// Immutable per-scan snapshot of the user's club overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideRanges {
    ranges: HashMap<ClubId, ClubOverride>,
}

impl OverrideRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, club_id: ClubId) -> Option<ClubOverride> {
        self.ranges.get(&club_id).copied()
    }

    pub fn insert(&mut self, club_id: ClubId, over: ClubOverride) {
        self.ranges.insert(club_id, over);
    }

    pub fn remove(&mut self, club_id: ClubId) -> Option<ClubOverride> {
        self.ranges.remove(&club_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClubId, ClubOverride)> + '_ {
        self.ranges.iter().map(|(id, over)| (*id, *over))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
