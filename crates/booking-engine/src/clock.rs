//! Minute-of-day helpers and the `"HH:MM"` wire format for times.

use chrono::{NaiveTime, Timelike};

use crate::error::{Result, SlotError};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since midnight, ignoring seconds.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inverse of [`minute_of_day`]. `None` for 24:00 and later.
pub fn time_from_minute(minute: u32) -> Option<NaiveTime> {
    if minute >= MINUTES_PER_DAY {
        return None;
    }
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Parse a `"HH:MM"` label.
pub fn parse_hhmm(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map_err(|_| SlotError::InvalidTime(input.to_string()))
}

/// Serde adapter: `NaiveTime` <-> `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(de::Error::custom)
    }
}

