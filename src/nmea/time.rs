// src/nmea/time.rs
//! UTC time/date normalization to a local timestamp

use crate::error::{GpsError, Result};
use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;

/// Display format for persisted timestamps: month:day:year, 12-hour
/// clock with AM/PM and the timezone abbreviation.
const TIMESTAMP_FORMAT: &str = "%m:%d:%Y %I:%M:%S %p %Z";

/// Convert RMC UTC time ("HHMMSS") and date ("DDMMYY") fields into a
/// formatted US Eastern timestamp, honoring daylight-saving rules at
/// the instant in question.
///
/// The two-digit year is expanded by adding 2000, which is valid
/// through 2099. Fails with `GpsError::InvalidTime` when a fixed-width
/// substring does not parse or the composed date/time is not a valid
/// calendar instant; callers should treat that as a skip.
pub fn normalize_timestamp(time_field: &str, date_field: &str) -> Result<String> {
    let hours = fixed_width(time_field, 0, "hours")?;
    let minutes = fixed_width(time_field, 2, "minutes")?;
    let seconds = fixed_width(time_field, 4, "seconds")?;
    let day = fixed_width(date_field, 0, "day")?;
    let month = fixed_width(date_field, 2, "month")?;
    let year = fixed_width(date_field, 4, "year")? as i32 + 2000;

    let utc = Utc
        .with_ymd_and_hms(year, month, day, hours, minutes, seconds)
        .single()
        .ok_or_else(|| {
            GpsError::InvalidTime(format!(
                "no such instant: {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hours, minutes, seconds
            ))
        })?;

    Ok(utc.with_timezone(&New_York).format(TIMESTAMP_FORMAT).to_string())
}

/// Extract the two-character substring starting at `offset` as an
/// integer. Fixed width, no separators.
fn fixed_width(field: &str, offset: usize, name: &str) -> Result<u32> {
    field
        .get(offset..offset + 2)
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| GpsError::InvalidTime(format!("bad {} in field {:?}", name, field)))
}
