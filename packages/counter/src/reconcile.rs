//! Backfilling partial day reports to exactly [`HOURS_PER_DAY`] hours.

use chrono::NaiveDate;
use city_data_counter_models::{HOURS_PER_DAY, HourlyCounts};

/// Normalizes a fetched report into exactly 24 hourly entries.
///
/// * An empty report becomes 24 zero hours.
/// * A short report for `today` is padded at the end: the camera has not
///   reported the rest of the day yet.
/// * A short report for a past day is padded at the start: the camera is
///   assumed to have come online partway through that day.
/// * Anything past the 24th entry is dropped.
#[must_use]
pub fn reconcile_day(
    mut report: Vec<HourlyCounts>,
    day: NaiveDate,
    today: NaiveDate,
) -> Vec<HourlyCounts> {
    if report.is_empty() {
        log::warn!("Empty report for {day}, writing zero counts");
        return vec![HourlyCounts::zeroed(); HOURS_PER_DAY];
    }

    if report.len() > HOURS_PER_DAY {
        log::warn!(
            "Report for {day} has {} entries, keeping the first {HOURS_PER_DAY}",
            report.len()
        );
        report.truncate(HOURS_PER_DAY);
        return report;
    }

    let missing = HOURS_PER_DAY - report.len();
    if missing == 0 {
        return report;
    }

    if day == today {
        log::debug!("Report for today ({day}) has {} hours", report.len());
        report.resize(HOURS_PER_DAY, HourlyCounts::zeroed());
        report
    } else {
        log::warn!(
            "Report for {day} has {} hours, zero-filling the first {missing}",
            report.len()
        );
        let mut padded = vec![HourlyCounts::zeroed(); missing];
        padded.extend(report);
        padded
    }
}
