//! Weekly reset schedule anchored on Thursday midnight, US Eastern civil time.

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::{America::New_York, Tz};

/// Civil time zone the weekly boundary is expressed in.
pub const RESET_TIMEZONE: Tz = New_York;
/// Weekday on which the poll rolls over.
pub const RESET_WEEKDAY: Weekday = Weekday::Thu;

/// Return the first Thursday 00:00:00.000 Eastern that lies strictly after `now`.
///
/// The civil day containing `now` never qualifies, so calling this exactly at
/// (or any time during) a Thursday yields the following week's boundary.
pub fn next_thursday_midnight_eastern(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.with_timezone(&RESET_TIMEZONE).date_naive();
    let current = today.weekday().num_days_from_monday();
    let target = RESET_WEEKDAY.num_days_from_monday();

    let days_ahead = match (7 + target - current) % 7 {
        0 => 7,
        days => days,
    };

    let midnight = (today + Days::new(u64::from(days_ahead))).and_time(NaiveTime::MIN);
    // New York switches DST at 02:00, so local midnight always exists exactly once.
    RESET_TIMEZONE
        .from_local_datetime(&midnight)
        .earliest()
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
