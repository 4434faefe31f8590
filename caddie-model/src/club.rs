use serde::{Deserialize, Serialize};

use crate::ids::{ClubId, ClubTypeId};

/// One taxonomy entry from the remote service ("Driver", "7 Iron", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubType {
    pub id: ClubTypeId,
    pub name: String,
}

/// One concrete club in the player's bag.
///
/// Lifetime stats come from the remote service and default to zero when the
/// service has never seen a shot with this club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub club_type_id: ClubTypeId,
    pub average_distance: f64,
    pub max_lifetime_distance: f64,
    pub shot_count: u32,
}

/// Display record for the club inventory: a club joined with its type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubReport {
    pub club_id: ClubId,
    pub club_type_id: ClubTypeId,
    pub name: String,
    pub average_distance: f64,
    pub max_lifetime_distance: f64,
    pub shot_count: u32,
}
