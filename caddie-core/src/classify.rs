//! The per-shot classification rule.
//!
//! Expected distances vary by club category by roughly an order of magnitude
//! (20 m for a putter, 350 m for a driver), and individual players calibrate
//! differently, so the built-in table can be overridden per club.

use caddie_model::{ClubId, ClubTypeId, DistanceEnvelope, OverrideRanges};

/// Putters legitimately record near-zero distances, so the lower bound never
/// applies to them.
pub const PUTTER_TYPE_ID: ClubTypeId = ClubTypeId(23);

/// Envelope applied when the club type is not in the built-in table.
pub const DEFAULT_ENVELOPE: DistanceEnvelope = DistanceEnvelope::bounded(5.0, 300.0);

/// Built-in admissible distance ceilings (meters) per club type.
pub fn builtin_envelope(club_type: ClubTypeId) -> DistanceEnvelope {
    match club_type.as_i64() {
        1 => DistanceEnvelope::max_only(350.0),  // Driver
        2 => DistanceEnvelope::max_only(280.0),  // 3 Wood
        3 => DistanceEnvelope::max_only(260.0),  // 5 Wood
        4 => DistanceEnvelope::max_only(250.0),  // 7 Wood
        5 => DistanceEnvelope::max_only(240.0),  // 9 Wood
        6 => DistanceEnvelope::max_only(240.0),  // 2 Hybrid
        7 => DistanceEnvelope::max_only(230.0),  // 3 Hybrid
        8 => DistanceEnvelope::max_only(220.0),  // 4 Hybrid
        9 => DistanceEnvelope::max_only(210.0),  // 5 Hybrid
        10 => DistanceEnvelope::max_only(200.0), // 6 Hybrid
        11 => DistanceEnvelope::max_only(240.0), // 2 Iron
        12 => DistanceEnvelope::max_only(230.0), // 3 Iron
        13 => DistanceEnvelope::max_only(220.0), // 4 Iron
        14 => DistanceEnvelope::max_only(210.0), // 5 Iron
        15 => DistanceEnvelope::max_only(200.0), // 6 Iron
        16 => DistanceEnvelope::max_only(190.0), // 7 Iron
        17 => DistanceEnvelope::max_only(180.0), // 8 Iron
        18 => DistanceEnvelope::max_only(170.0), // 9 Iron
        19 => DistanceEnvelope::max_only(150.0), // PW
        20 => DistanceEnvelope::max_only(140.0), // AW
        21 => DistanceEnvelope::max_only(130.0), // SW
        22 => DistanceEnvelope::max_only(120.0), // LW
        23 => DistanceEnvelope::max_only(20.0),  // Putter
        24 => DistanceEnvelope::max_only(150.0), // GW
        _ => DEFAULT_ENVELOPE,
    }
}

/// Decide whether one measured distance is out of range for the club that
/// recorded it.
///
/// A present override replaces the built-in table entirely and is max-only;
/// exactly hitting a bound is admissible.
pub fn is_suspicious(
    club_id: ClubId,
    club_type: ClubTypeId,
    meters: Option<f64>,
    overrides: &OverrideRanges,
) -> bool {
    let Some(meters) = meters else {
        // Unmeasured shots cannot be classified.
        return false;
    };

    if let Some(over) = overrides.get(club_id) {
        return meters > over.max_meters;
    }

    let envelope = builtin_envelope(club_type);

    if club_type == PUTTER_TYPE_ID {
        return envelope
            .max_meters
            .is_some_and(|max| meters > max);
    }

    if envelope.min_meters.is_some_and(|min| meters < min) {
        return true;
    }

    envelope.max_meters.is_some_and(|max| meters > max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caddie_model::ClubOverride;

    const DRIVER: ClubTypeId = ClubTypeId(1);
    const UNKNOWN_TYPE: ClubTypeId = ClubTypeId(999);
    const SOME_CLUB: ClubId = ClubId(100);

    fn no_overrides() -> OverrideRanges {
        OverrideRanges::new()
    }

    #[test]
    fn unmeasured_shots_are_never_flagged() {
        let mut overrides = OverrideRanges::new();
        overrides.insert(SOME_CLUB, ClubOverride { max_meters: 1.0 });

        assert!(!is_suspicious(SOME_CLUB, DRIVER, None, &no_overrides()));
        assert!(!is_suspicious(SOME_CLUB, PUTTER_TYPE_ID, None, &no_overrides()));
        assert!(!is_suspicious(SOME_CLUB, DRIVER, None, &overrides));
    }

    #[test]
    fn driver_boundary_is_inclusive() {
        assert!(!is_suspicious(SOME_CLUB, DRIVER, Some(350.0), &no_overrides()));
        assert!(is_suspicious(SOME_CLUB, DRIVER, Some(351.0), &no_overrides()));
    }

    #[test]
    fn putter_ignores_lower_bound() {
        assert!(!is_suspicious(
            SOME_CLUB,
            PUTTER_TYPE_ID,
            Some(5.0),
            &no_overrides()
        ));
        assert!(!is_suspicious(
            SOME_CLUB,
            PUTTER_TYPE_ID,
            Some(0.0),
            &no_overrides()
        ));
        assert!(is_suspicious(
            SOME_CLUB,
            PUTTER_TYPE_ID,
            Some(25.0),
            &no_overrides()
        ));
    }

    #[test]
    fn unknown_type_uses_default_envelope() {
        assert!(is_suspicious(SOME_CLUB, UNKNOWN_TYPE, Some(3.0), &no_overrides()));
        assert!(is_suspicious(
            SOME_CLUB,
            UNKNOWN_TYPE,
            Some(305.0),
            &no_overrides()
        ));
        assert!(!is_suspicious(
            SOME_CLUB,
            UNKNOWN_TYPE,
            Some(150.0),
            &no_overrides()
        ));
    }

    #[test]
    fn override_takes_precedence_over_builtin() {
        let mut overrides = OverrideRanges::new();
        overrides.insert(SOME_CLUB, ClubOverride { max_meters: 100.0 });

        // Driver default max is 350, but the override wins.
        assert!(is_suspicious(SOME_CLUB, DRIVER, Some(101.0), &overrides));
        assert!(!is_suspicious(SOME_CLUB, DRIVER, Some(99.0), &overrides));

        // Other clubs keep the built-in table.
        assert!(!is_suspicious(ClubId(200), DRIVER, Some(101.0), &overrides));
    }

    #[test]
    fn override_has_no_lower_bound() {
        let mut overrides = OverrideRanges::new();
        overrides.insert(SOME_CLUB, ClubOverride { max_meters: 100.0 });

        // Max-only: a distance below every built-in minimum is fine when an
        // override is present.
        assert!(!is_suspicious(SOME_CLUB, UNKNOWN_TYPE, Some(1.0), &overrides));
    }
}
