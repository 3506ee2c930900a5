//! 12-hour to 24-hour timestamp conversion.

use chrono::{Datelike, NaiveDateTime, Timelike};
use thiserror::Error;

/// Layout of the timestamp once the meridiem marker is removed
const INPUT_LAYOUT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimestampError {
    #[error("missing AM/PM marker in '{0}'")]
    MissingMarker(String),

    #[error("cannot parse '{value}': {reason}")]
    Parse { value: String, reason: String },

    #[error("hour {hour} outside 1-12 in '{value}'")]
    HourOutOfRange { value: String, hour: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    /// Map a 1-12 clock hour to 0-23.
    pub fn to_24_hour(self, hour: u32) -> u32 {
        match (self, hour) {
            (Meridiem::Pm, h) if h != 12 => h + 12,
            (Meridiem::Am, 12) => 0,
            (_, h) => h,
        }
    }
}

/// Split `MM/DD/YYYY hh:mm:ss AM|PM` into its clock part and marker.
fn split_marker(value: &str) -> Result<(&str, Meridiem), TimestampError> {
    if let Some(clock) = value.strip_suffix(" AM") {
        Ok((clock, Meridiem::Am))
    } else if let Some(clock) = value.strip_suffix(" PM") {
        Ok((clock, Meridiem::Pm))
    } else {
        Err(TimestampError::MissingMarker(value.to_string()))
    }
}

/// Rewrite `MM/DD/YYYY hh:mm:ss AM|PM` as `YYYY-M-DTH:m:s` with a 24-hour hour.
///
/// Components are rendered without zero padding, so `01/02/2016 01:05:09 PM`
/// becomes `2016-1-2T13:5:9`.
pub fn normalize_timestamp(value: &str) -> Result<String, TimestampError> {
    let (clock, meridiem) = split_marker(value)?;

    let parsed = NaiveDateTime::parse_from_str(clock, INPUT_LAYOUT).map_err(|e| {
        TimestampError::Parse {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;

    let hour = parsed.hour();
    if !(1..=12).contains(&hour) {
        return Err(TimestampError::HourOutOfRange {
            value: value.to_string(),
            hour,
        });
    }

    Ok(format!(
        "{}-{}-{}T{}:{}:{}",
        parsed.year(),
        parsed.month(),
        parsed.day(),
        meridiem.to_24_hour(hour),
        parsed.minute(),
        parsed.second()
    ))
}
