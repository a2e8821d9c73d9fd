//! Per-day UTC fetch windows.
//!
//! The Telraam API speaks UTC while output files are keyed by local day.
//! The UTC offset is resolved once per run (see [`RunClock`]) and reused
//! for every camera and day of that run, so a run spanning a daylight
//! saving change uses one offset throughout.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset as _, TimeDelta, TimeZone as _, Utc};
use chrono_tz::Tz;

/// Timestamp format used by the Telraam API and the CSV index column.
pub const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Wall-clock facts fixed at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    /// The local calendar date the run treats as "today".
    pub today: NaiveDate,
    /// Local time minus UTC.
    pub utc_offset: TimeDelta,
}

impl RunClock {
    /// Resolves today's date and the UTC offset of `tz` at `now`.
    #[must_use]
    pub fn at(now: DateTime<Utc>, tz: Tz) -> Self {
        let offset = tz.offset_from_utc_datetime(&now.naive_utc()).fix();
        Self {
            today: now.with_timezone(&tz).date_naive(),
            utc_offset: TimeDelta::seconds(i64::from(offset.local_minus_utc())),
        }
    }

    /// Resolves the clock from the current system time.
    #[must_use]
    pub fn now(tz: Tz) -> Self {
        Self::at(Utc::now(), tz)
    }
}

/// UTC instants covering one local day, midnight to 23:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// The local day.
    pub day: NaiveDate,
    /// Local midnight expressed in UTC.
    pub from: NaiveDateTime,
    /// Local 23:59 expressed in UTC.
    pub to: NaiveDateTime,
}

impl DayWindow {
    /// Computes the window for `day` under a fixed `utc_offset`.
    #[must_use]
    pub fn new(day: NaiveDate, utc_offset: TimeDelta) -> Self {
        let midnight = day.and_time(chrono::NaiveTime::MIN);
        let from = midnight - utc_offset;
        let to = midnight + TimeDelta::hours(23) + TimeDelta::minutes(59) - utc_offset;
        Self { day, from, to }
    }

    /// Window start in API format.
    #[must_use]
    pub fn start_param(&self) -> String {
        self.from.format(API_TIME_FORMAT).to_string()
    }

    /// Window end in API format.
    #[must_use]
    pub fn end_param(&self) -> String {
        self.to.format(API_TIME_FORMAT).to_string()
    }

    /// Local timestamp of the `hour`-th hour of the day, in API format.
    #[must_use]
    pub fn local_hour_label(&self, hour: u32, utc_offset: TimeDelta) -> String {
        let utc = self.from + TimeDelta::hours(i64::from(hour));
        (utc + utc_offset).format(API_TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn summer_window_shifts_by_three_hours() {
        let window = DayWindow::new(date("2024-06-10"), TimeDelta::hours(3));
        assert_eq!(window.start_param(), "2024-06-09 21:00:00");
        assert_eq!(window.end_param(), "2024-06-10 20:59:00");
    }

    #[test]
    fn handles_fractional_hour_offsets() {
        let window = DayWindow::new(date("2024-01-15"), TimeDelta::minutes(330));
        assert_eq!(window.start_param(), "2024-01-14 18:30:00");
        assert_eq!(window.end_param(), "2024-01-15 18:29:00");
    }

    #[test]
    fn local_hour_labels_start_at_local_midnight() {
        let offset = TimeDelta::hours(2);
        let window = DayWindow::new(date("2024-01-15"), offset);
        assert_eq!(window.local_hour_label(0, offset), "2024-01-15 00:00:00");
        assert_eq!(window.local_hour_label(23, offset), "2024-01-15 23:00:00");
    }

    #[test]
    fn clock_uses_local_date_and_dst_offset() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 22, 30, 0).unwrap();
        let clock = RunClock::at(now, chrono_tz::Europe::Helsinki);
        assert_eq!(clock.today, date("2024-06-11"));
        assert_eq!(clock.utc_offset, TimeDelta::hours(3));

        let winter = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let clock = RunClock::at(winter, chrono_tz::Europe::Helsinki);
        assert_eq!(clock.utc_offset, TimeDelta::hours(2));
    }
}
