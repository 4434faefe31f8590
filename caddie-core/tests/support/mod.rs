//! Scripted test doubles shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use caddie_core::error::{CaddieError, Result};
use caddie_core::gateway::GolfApi;
use caddie_core::scan::ProgressReporter;
use caddie_model::{
    Club, ClubId, ClubType, ClubTypeId, HoleShots, PlayerId, ScorecardDetail, ScorecardId,
    ScorecardSummary, Shot,
};
use tokio_util::sync::CancellationToken;

/// Scripted [`GolfApi`] backend: fixed fixtures in, recorded calls out.
#[derive(Default)]
pub struct StubGolfApi {
    pub types: Vec<ClubType>,
    pub clubs: Vec<Club>,
    pub scorecards: Vec<ScorecardSummary>,
    /// Details by scorecard id; a missing entry behaves like a refused fetch.
    pub details: HashMap<i64, ScorecardDetail>,
    /// Scorecard ids whose detail fetch errors outright.
    pub failing_details: Vec<i64>,
    pub fail_club_types: bool,
    pub fail_player_clubs: bool,
    /// Artificial latency per detail fetch, to keep a scan observable.
    pub detail_delay: Option<Duration>,
    pub detail_calls: AtomicUsize,
    pub detail_order: Mutex<Vec<ScorecardId>>,
}

impl StubGolfApi {
    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GolfApi for StubGolfApi {
    async fn club_types(&self) -> Result<Vec<ClubType>> {
        if self.fail_club_types {
            return Err(CaddieError::Internal("injected taxonomy failure".into()));
        }
        Ok(self.types.clone())
    }

    async fn player_clubs(&self) -> Result<Vec<Club>> {
        if self.fail_player_clubs {
            return Err(CaddieError::Internal("injected bag failure".into()));
        }
        Ok(self.clubs.clone())
    }

    async fn scorecard_summaries(&self) -> Result<Vec<ScorecardSummary>> {
        Ok(self.scorecards.clone())
    }

    async fn scorecard_shots(&self, scorecard: ScorecardId) -> Result<Option<ScorecardDetail>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.detail_order
            .lock()
            .expect("detail order lock poisoned")
            .push(scorecard);

        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_details.contains(&scorecard.as_i64()) {
            return Err(CaddieError::Internal("injected detail failure".into()));
        }

        Ok(self.details.get(&scorecard.as_i64()).cloned())
    }
}

/// Records every progress frame it sees.
#[derive(Default)]
pub struct RecordingReporter {
    pub frames: Mutex<Vec<(String, f32)>>,
}

impl RecordingReporter {
    pub fn frames(&self) -> Vec<(String, f32)> {
        self.frames.lock().expect("frame lock poisoned").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str, percent: f32) -> bool {
        self.frames
            .lock()
            .expect("frame lock poisoned")
            .push((message.to_string(), percent));
        true
    }
}

/// Cancels the token the first time a frame's message starts with `trigger`,
/// mimicking a user pressing cancel at a specific point in the scan.
pub struct CancelOnMessage {
    pub token: CancellationToken,
    pub trigger: String,
}

impl ProgressReporter for CancelOnMessage {
    fn report(&self, message: &str, _percent: f32) -> bool {
        if message.starts_with(&self.trigger) {
            self.token.cancel();
        }
        true
    }
}

pub fn club_type(id: i64, name: &str) -> ClubType {
    ClubType {
        id: ClubTypeId(id),
        name: name.to_string(),
    }
}

pub fn club(id: i64, type_id: i64) -> Club {
    Club {
        id: ClubId(id),
        club_type_id: ClubTypeId(type_id),
        average_distance: 0.0,
        max_lifetime_distance: 0.0,
        shot_count: 0,
    }
}

pub fn scorecard(id: i64, course: &str) -> ScorecardSummary {
    ScorecardSummary {
        id: ScorecardId(id),
        start_date: format!("2024-06-{:02}T09:00:00.0", (id % 27) + 1),
        course_name: Some(course.to_string()),
    }
}

pub fn hole(number: u32, shots: Vec<Shot>) -> HoleShots {
    HoleShots {
        hole_number: number,
        shots,
    }
}

pub fn shot(club_id: i64, order: u32, meters: Option<f64>) -> Shot {
    Shot {
        club_id: ClubId(club_id),
        shot_order: order,
        meters,
        player_profile_id: PlayerId(7),
    }
}

/// A driver (type 1) and a putter (type 23) bag, the smallest fixture that
/// exercises both classification branches.
pub fn standard_fixture() -> (Vec<ClubType>, Vec<Club>) {
    let types = vec![club_type(1, "Driver"), club_type(23, "Putter")];
    let clubs = vec![club(100, 1), club(101, 23)];
    (types, clubs)
}
