//! Record timestamps
//!
//! Every line carries a millisecond-precision wall-clock time followed by the
//! abbreviation of the configured zone, e.g. `2025-01-08 11:30:45.123 CET`.

use super::error::{LoggerError, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// strftime pattern of the `timestamp` field
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %Z";

/// Format `datetime` in `zone` using [`RECORD_TIMESTAMP_FORMAT`]
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use filtertag::core::timestamp::format_timestamp;
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(format_timestamp(&at, &chrono_tz::UTC), "2025-01-08 10:30:45.000 UTC");
/// ```
#[must_use]
pub fn format_timestamp(datetime: &DateTime<Utc>, zone: &Tz) -> String {
    datetime
        .with_timezone(zone)
        .format(RECORD_TIMESTAMP_FORMAT)
        .to_string()
}

/// Current time formatted for a record
#[must_use]
pub fn now(zone: &Tz) -> String {
    format_timestamp(&Utc::now(), zone)
}

/// Parse an IANA zone name such as `Europe/Prague`
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| LoggerError::InvalidTimeZone(name.to_string()))
}

/// Zone named by the `TZ` environment variable, falling back to UTC
#[must_use]
pub fn zone_from_env() -> Tz {
    std::env::var("TZ")
        .ok()
        .and_then(|name| parse_zone(name.trim_start_matches(':')).ok())
        .unwrap_or(chrono_tz::UTC)
}
