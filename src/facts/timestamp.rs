//! Conversion of API timestamps into report-local time.

use crate::misc::ReportTimezone;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

const LOG_TARGET: &str = "timestamps";

/// Stand-in for timestamps that cannot be parsed.
///
/// Lies far enough in the past that such items sort last and fall outside any recent year.
#[must_use]
pub fn sentinel_time() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .unwrap_or_default()
}

/// Parses an RFC 3339 timestamp and moves it into the report timezone.
///
/// Unparseable input is logged and replaced by [`sentinel_time`].
#[must_use]
pub fn parse_timestamp(raw: &str, timezone: &ReportTimezone) -> DateTime<FixedOffset> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => timezone.localize(parsed.with_timezone(&Utc)),
        Err(e) => {
            log::error!(target: LOG_TARGET, "Could not parse timestamp '{raw}': {e}");
            sentinel_time()
        }
    }
}
