use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use caddie_model::{
    Club, ClubId, ClubType, ClubTypeId, PlayerId, ScorecardDetail, ScorecardId,
    ScorecardSummary, Shot,
};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::CredentialStore;
use crate::error::{CaddieError, Result};

const DEFAULT_BASE_URL: &str = "https://connect.garmin.com";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Fixed protocol headers the golf community API expects on every call.
const HEADER_NK: (&str, &str) = ("NK", "NT");
const HEADER_APP_VER: (&str, &str) = ("X-App-Ver", "5.16.0.31");
const HEADER_LANG: (&str, &str) = ("X-Lang", "en-US");
const HEADER_BACKEND: (&str, &str) = ("di-backend", "golf.garmin.com");

const CLUB_TYPES_PATH: &str = "/gcs-golfcommunity/api/v2/club/types?maxClubTypeId=42";
const PLAYER_CLUBS_PATH: &str =
    "/gcs-golfcommunity/api/v2/club/player?per-page=1000&include-stats=true&maxClubTypeId=42";
const SCORECARD_SUMMARY_PATH: &str =
    "/gcs-golfcommunity/api/v2/scorecard/summary?user-locale=en&per-page=10000";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// reqwest-backed [`GolfApi`](super::GolfApi) against the Garmin-style golf
/// community endpoints.
pub struct ConnectGateway {
    client: Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl std::fmt::Debug for ConnectGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ConnectGateway {
    pub fn new(config: GatewayConfig, credentials: Arc<CredentialStore>) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();

        Ok(ConnectGateway {
            client,
            base_url,
            credentials,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch(&self, path: &str) -> Result<reqwest::Response> {
        let credential = self
            .credentials
            .get()
            .ok_or(CaddieError::Unauthenticated)?;

        let response = self
            .client
            .get(self.build_url(path))
            .header("Accept", "application/json, text/plain, */*")
            .header(HEADER_NK.0, HEADER_NK.1)
            .header(HEADER_APP_VER.0, HEADER_APP_VER.1)
            .header(HEADER_LANG.0, HEADER_LANG.1)
            .header(HEADER_BACKEND.0, HEADER_BACKEND.1)
            .bearer_auth(credential.expose())
            .send()
            .await?;

        debug!(target: "gateway", path, status = %response.status(), "remote read");
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.fetch(path).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CaddieError::RemoteRejected { status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|err| CaddieError::MalformedResponse(err.to_string()))
    }
}

#[async_trait]
impl super::GolfApi for ConnectGateway {
    async fn club_types(&self) -> Result<Vec<ClubType>> {
        let rows: Vec<ClubTypeDto> = self.get_json(CLUB_TYPES_PATH).await?;
        Ok(rows.into_iter().map(ClubTypeDto::into_model).collect())
    }

    async fn player_clubs(&self) -> Result<Vec<Club>> {
        let rows: Vec<ClubDto> = self.get_json(PLAYER_CLUBS_PATH).await?;
        Ok(rows.into_iter().map(ClubDto::into_model).collect())
    }

    async fn scorecard_summaries(&self) -> Result<Vec<ScorecardSummary>> {
        let envelope: ScorecardSummaryEnvelope = self.get_json(SCORECARD_SUMMARY_PATH).await?;
        Ok(envelope
            .scorecard_summaries
            .into_iter()
            .map(ScorecardSummaryDto::into_model)
            .collect())
    }

    async fn scorecard_shots(&self, scorecard: ScorecardId) -> Result<Option<ScorecardDetail>> {
        let path = format!(
            "/gcs-golfcommunity/api/v2/shot/scorecard/{}/hole?image-size=IMG_730X730",
            scorecard.as_i64()
        );

        let response = self.fetch(&path).await?;
        let status = response.status();
        if !status.is_success() {
            // One refused scorecard is not fatal to a scan; the caller skips it.
            warn!(target: "gateway", %scorecard, %status, "shot detail fetch refused");
            return Ok(None);
        }

        let body = response.text().await?;
        let detail: ScorecardDetailDto = serde_json::from_str(&body)
            .map_err(|err| CaddieError::MalformedResponse(err.to_string()))?;
        Ok(Some(detail.into_model()))
    }
}

// Wire shapes. The service speaks camelCase and omits empty collections, so
// everything optional gets a default.

#[derive(Deserialize)]
struct ClubTypeDto {
    value: i64,
    name: String,
}

impl ClubTypeDto {
    fn into_model(self) -> ClubType {
        ClubType {
            id: ClubTypeId(self.value),
            name: self.name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClubDto {
    id: i64,
    club_type_id: i64,
    #[serde(default)]
    club_stats: Option<ClubStatsDto>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ClubStatsDto {
    #[serde(default)]
    average_distance: Option<f64>,
    #[serde(default)]
    max_lifetime_distance: Option<f64>,
    #[serde(default)]
    shots_count: Option<u32>,
}

impl ClubDto {
    fn into_model(self) -> Club {
        let stats = self.club_stats.unwrap_or_default();
        Club {
            id: ClubId(self.id),
            club_type_id: ClubTypeId(self.club_type_id),
            average_distance: stats.average_distance.unwrap_or(0.0),
            max_lifetime_distance: stats.max_lifetime_distance.unwrap_or(0.0),
            shot_count: stats.shots_count.unwrap_or(0),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScorecardSummaryEnvelope {
    #[serde(default)]
    scorecard_summaries: Vec<ScorecardSummaryDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScorecardSummaryDto {
    id: i64,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    course_name: Option<String>,
}

impl ScorecardSummaryDto {
    fn into_model(self) -> ScorecardSummary {
        ScorecardSummary {
            id: ScorecardId(self.id),
            start_date: self.start_date.unwrap_or_default(),
            course_name: self.course_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScorecardDetailDto {
    #[serde(default)]
    hole_shots: Vec<HoleShotsDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoleShotsDto {
    hole_number: u32,
    #[serde(default)]
    shots: Vec<ShotDto>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShotDto {
    club_id: i64,
    #[serde(default)]
    shot_order: u32,
    #[serde(default)]
    meters: Option<f64>,
    #[serde(default)]
    player_profile_id: i64,
}

impl ScorecardDetailDto {
    fn into_model(self) -> ScorecardDetail {
        ScorecardDetail {
            hole_shots: self
                .hole_shots
                .into_iter()
                .map(|hole| caddie_model::HoleShots {
                    hole_number: hole.hole_number,
                    shots: hole
                        .shots
                        .into_iter()
                        .map(|shot| Shot {
                            club_id: ClubId(shot.club_id),
                            shot_order: shot.shot_order,
                            meters: shot.meters,
                            player_profile_id: PlayerId(shot.player_profile_id),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scorecard_summary_envelope_tolerates_missing_list() {
        let envelope: ScorecardSummaryEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.scorecard_summaries.is_empty());
    }

    #[test]
    fn club_stats_default_to_zero() {
        let dto: ClubDto =
            serde_json::from_str(r#"{"id": 7, "clubTypeId": 1}"#).unwrap();
        let club = dto.into_model();
        assert_eq!(club.id, ClubId(7));
        assert_eq!(club.average_distance, 0.0);
        assert_eq!(club.shot_count, 0);
    }

    #[test]
    fn shot_detail_parses_sparse_payload() {
        let raw = r#"{
            "holeShots": [
                { "holeNumber": 3 },
                { "holeNumber": 4, "shots": [
                    { "clubId": 11, "shotOrder": 2, "meters": 180.5, "playerProfileId": 99 },
                    { "clubId": 12, "meters": null }
                ] }
            ]
        }"#;
        let detail: ScorecardDetailDto = serde_json::from_str(raw).unwrap();
        let model = detail.into_model();
        assert_eq!(model.hole_shots.len(), 2);
        assert!(model.hole_shots[0].shots.is_empty());
        assert_eq!(model.hole_shots[1].shots[0].meters, Some(180.5));
        assert_eq!(model.hole_shots[1].shots[1].meters, None);
    }
}
