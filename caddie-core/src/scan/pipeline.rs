use std::time::Duration;

use caddie_model::{FlaggedShot, OverrideRanges};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::classify;
use crate::error::Result;
use crate::gateway::GolfApi;
use crate::reference::ClubDirectory;

/// Courtesy pause between scorecard detail fetches; the remote service rate
/// limits aggressively.
pub const INTER_SCORECARD_DELAY: Duration = Duration::from_millis(100);

/// Where progress frames go.
///
/// `report` returns false when the frame was refused because the scan is no
/// longer current; the pipeline treats that exactly like cancellation.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str, percent: f32) -> bool;
}

/// No-op reporter for callers that only want the result.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _message: &str, _percent: f32) -> bool {
        true
    }
}

/// Run one full scan: build references, enumerate scorecards, classify every
/// shot, accumulate the flagged ones.
///
/// Failures fetching the taxonomy or the bag are fatal: nothing can be
/// classified without them. Failures fetching one scorecard's detail are
/// logged and skipped. Cancellation is polled at per-scorecard boundaries
/// only, never mid-fetch, and yields the partial result accumulated so far.
///
/// Flagged shots come back in scorecard → hole → shot iteration order, in the
/// order the service listed the scorecards; nothing is reordered or deduped.
pub async fn run_scan(
    gateway: &dyn GolfApi,
    overrides: &OverrideRanges,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> Result<Vec<FlaggedShot>> {
    let mut flagged: Vec<FlaggedShot> = Vec::new();

    reporter.report("Fetching club types...", 2.0);
    let types = gateway.club_types().await?;

    reporter.report("Fetching clubs...", 5.0);
    let clubs = gateway.player_clubs().await?;
    let directory = ClubDirectory::build(&types, &clubs);
    info!(
        target: "scan::progress",
        club_types = types.len(),
        clubs = directory.len(),
        "reference maps built"
    );

    reporter.report("Fetching scorecards...", 10.0);
    let scorecards = gateway.scorecard_summaries().await?;

    if scorecards.is_empty() {
        reporter.report("No scorecards found", 100.0);
        return Ok(flagged);
    }

    let total = scorecards.len();
    for (index, scorecard) in scorecards.iter().enumerate() {
        let percent = 10.0 + (index as f32 / total as f32) * 85.0;
        let still_wanted = reporter.report(
            &format!("Processing scorecard {}/{}...", index + 1, total),
            percent,
        );

        if !still_wanted || cancel.is_cancelled() {
            info!(
                target: "scan::progress",
                processed = index,
                total,
                flagged = flagged.len(),
                "scan stopped at checkpoint; returning partial results"
            );
            return Ok(flagged);
        }

        let detail = match gateway.scorecard_shots(scorecard.id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                warn!(target: "scan::progress", scorecard = %scorecard.id, "detail unavailable, skipping scorecard");
                continue;
            }
            Err(err) => {
                // One bad scorecard never aborts the whole scan.
                warn!(target: "scan::progress", scorecard = %scorecard.id, error = %err, "detail fetch failed, skipping scorecard");
                continue;
            }
        };

        for hole in &detail.hole_shots {
            for shot in &hole.shots {
                let Some(club_type) = directory.type_of(shot.club_id) else {
                    // A shot recorded with a club we know nothing about
                    // cannot be classified.
                    continue;
                };

                if classify::is_suspicious(shot.club_id, club_type, shot.meters, overrides) {
                    flagged.push(FlaggedShot {
                        scorecard_id: scorecard.id,
                        scorecard_date: scorecard.start_date.clone(),
                        course_name: scorecard.course_name.clone(),
                        hole_number: hole.hole_number,
                        club_name: directory.display_name(shot.club_id).to_string(),
                        meters: shot.meters,
                        shot_order: shot.shot_order,
                        player_profile_id: shot.player_profile_id,
                    });
                }
            }
        }

        tokio::time::sleep(INTER_SCORECARD_DELAY).await;
    }

    info!(
        target: "scan::progress",
        scorecards = total,
        flagged = flagged.len(),
        "scan complete"
    );
    reporter.report("Scan complete!", 100.0);
    Ok(flagged)
}
