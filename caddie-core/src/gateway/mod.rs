//! Read-only view of the remote golf service.
//!
//! Four independent, idempotent reads; no retries happen here, callers decide
//! retry policy. Everything fails typed: [`CaddieError::Unauthenticated`] when
//! no credential is present, [`CaddieError::RemoteRejected`] on a non-success
//! status, [`CaddieError::MalformedResponse`] when the payload does not parse.
//!
//! [`CaddieError::Unauthenticated`]: crate::error::CaddieError::Unauthenticated
//! [`CaddieError::RemoteRejected`]: crate::error::CaddieError::RemoteRejected
//! [`CaddieError::MalformedResponse`]: crate::error::CaddieError::MalformedResponse

mod connect;

pub use connect::{ConnectGateway, GatewayConfig};

use async_trait::async_trait;
use caddie_model::{Club, ClubType, ScorecardDetail, ScorecardId, ScorecardSummary};

use crate::error::Result;

/// The seam between the pipeline and the wire. Production uses
/// [`ConnectGateway`]; tests substitute scripted backends.
#[async_trait]
pub trait GolfApi: Send + Sync {
    /// The club-type taxonomy (id → display name).
    async fn club_types(&self) -> Result<Vec<ClubType>>;

    /// Every club in the player's bag, with lifetime stats where available.
    async fn player_clubs(&self) -> Result<Vec<Club>>;

    /// Summary rows for all recorded rounds, in service order.
    async fn scorecard_summaries(&self) -> Result<Vec<ScorecardSummary>>;

    /// Per-hole shot detail for one scorecard. `Ok(None)` means the service
    /// refused this one scorecard; recoverable, not fatal.
    async fn scorecard_shots(&self, scorecard: ScorecardId) -> Result<Option<ScorecardDetail>>;
}
