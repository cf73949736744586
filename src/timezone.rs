//! Converts the configured timezone name into UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// Look up a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Logs and returns [Error::InvalidTimezoneError] for an unknown name.
pub fn try_get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {canonical_timezone}");
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The UTC offset `timezone` observed at `date_time`.
///
/// Daylight saving is resolved for `date_time` itself, not for the current date.
pub fn get_offset_at(timezone: &Tz, date_time: OffsetDateTime) -> UtcOffset {
    timezone.get_offset_utc(&date_time).to_utc()
}
