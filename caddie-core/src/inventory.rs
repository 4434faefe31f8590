//! Club inventory report: the player's bag joined with the taxonomy, with
//! lifetime stats. This is the data a user needs to pick override ceilings.

use caddie_model::ClubReport;

use crate::error::Result;
use crate::gateway::GolfApi;
use crate::reference::ClubDirectory;

pub async fn player_club_report(gateway: &dyn GolfApi) -> Result<Vec<ClubReport>> {
    let types = gateway.club_types().await?;
    let clubs = gateway.player_clubs().await?;
    let directory = ClubDirectory::build(&types, &clubs);

    Ok(clubs
        .iter()
        .map(|club| ClubReport {
            club_id: club.id,
            club_type_id: club.club_type_id,
            name: directory.display_name(club.id).to_string(),
            average_distance: club.average_distance,
            max_lifetime_distance: club.max_lifetime_distance,
            shot_count: club.shot_count,
        })
        .collect())
}
