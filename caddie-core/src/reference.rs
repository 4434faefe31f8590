//! Build-once lookup tables joining the club-type taxonomy with the player's
//! bag. Read-only for the remainder of the scan that built them.

use std::collections::HashMap;

use caddie_model::{Club, ClubId, ClubType, ClubTypeId};

#[derive(Debug, Clone, Default)]
pub struct ClubDirectory {
    names: HashMap<ClubId, String>,
    types: HashMap<ClubId, ClubTypeId>,
}

impl ClubDirectory {
    pub fn build(types: &[ClubType], clubs: &[Club]) -> Self {
        let type_names: HashMap<ClubTypeId, &str> = types
            .iter()
            .map(|club_type| (club_type.id, club_type.name.as_str()))
            .collect();

        let mut names = HashMap::with_capacity(clubs.len());
        let mut club_types = HashMap::with_capacity(clubs.len());

        for club in clubs {
            // Taxonomy drift: a club can reference a type id the taxonomy no
            // longer lists. Synthesize a label rather than dropping the club.
            let name = type_names
                .get(&club.club_type_id)
                .map(|name| (*name).to_string())
                .unwrap_or_else(|| format!("Club Type {}", club.club_type_id));

            names.insert(club.id, name);
            club_types.insert(club.id, club.club_type_id);
        }

        ClubDirectory {
            names,
            types: club_types,
        }
    }

    pub fn name_of(&self, club_id: ClubId) -> Option<&str> {
        self.names.get(&club_id).map(String::as_str)
    }

    /// Display name, `"Unknown"` for a club id the bag does not contain.
    pub fn display_name(&self, club_id: ClubId) -> &str {
        self.name_of(club_id).unwrap_or("Unknown")
    }

    pub fn type_of(&self, club_id: ClubId) -> Option<ClubTypeId> {
        self.types.get(&club_id).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
