//! Terminal rendering for progress frames and scan results.

use std::io::Write;

use caddie_model::{ClubReport, FlaggedShot, ScanProgress};
use chrono::NaiveDateTime;

/// Distances past this read as data errors at a glance and get an extra mark.
const EXTREME_DISTANCE_METERS: f64 = 200.0;

pub fn print_progress(frame: &ScanProgress) {
    print!("\r[{:>3.0}%] {:<50}", frame.percent, frame.message);
    let _ = std::io::stdout().flush();
}

pub fn finish_progress_line() {
    println!();
}

pub fn print_club_reports(reports: &[ClubReport]) {
    if reports.is_empty() {
        println!("No clubs found in the player's bag.");
        return;
    }

    println!(
        "{:>8}  {:<16} {:>10} {:>10} {:>7}",
        "club id", "club", "avg (m)", "max (m)", "shots"
    );
    for report in reports {
        println!(
            "{:>8}  {:<16} {:>10.1} {:>10.1} {:>7}",
            report.club_id.as_i64(),
            report.name,
            report.average_distance,
            report.max_lifetime_distance,
            report.shot_count
        );
    }
}

/// Flagged shots grouped by scorecard, in scan order.
pub fn print_flagged_shots(flagged: &[FlaggedShot]) {
    if flagged.is_empty() {
        println!("No suspicious shots found.");
        return;
    }

    let plural = if flagged.len() == 1 { "" } else { "s" };
    println!("Found {} suspicious shot{plural}:", flagged.len());

    let mut current_scorecard = None;
    for flag in flagged {
        if current_scorecard != Some(flag.scorecard_id) {
            current_scorecard = Some(flag.scorecard_id);
            println!();
            println!(
                "{} - {}",
                flag.course_name.as_deref().unwrap_or("Unknown Course"),
                format_date(&flag.scorecard_date)
            );
        }

        let distance = match flag.meters {
            Some(meters) => format!("{:.0}m", meters),
            None => "N/A".to_string(),
        };
        let marker = if flag.meters.is_some_and(|m| m > EXTREME_DISTANCE_METERS) {
            "  <- extreme"
        } else {
            ""
        };
        println!(
            "  hole {:>2}  shot {:>2}  {:<16} {:>6}{}",
            flag.hole_number, flag.shot_order, flag.club_name, distance, marker
        );
    }
}

/// Best-effort date rendering; the remote format is not guaranteed.
pub fn format_date(raw: &str) -> String {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.format("%b %-d, %Y").to_string();
        }
        if let Ok(parsed) = chrono::NaiveDate::parse_from_str(raw, format) {
            return parsed.format("%b %-d, %Y").to_string();
        }
    }
    if raw.is_empty() {
        "Unknown date".to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_service_style_dates() {
        assert_eq!(format_date("2024-06-01T09:00:00.0"), "Jun 1, 2024");
        assert_eq!(format_date("2024-11-23T14:30:00"), "Nov 23, 2024");
    }

    #[test]
    fn unparseable_dates_fall_back() {
        assert_eq!(format_date(""), "Unknown date");
        assert_eq!(format_date("next tuesday"), "next tuesday");
    }
}
