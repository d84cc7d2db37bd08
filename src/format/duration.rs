//! Short duration strings (`5d`, `3h`) and remaining-time breakdowns.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::error::{AuctionError, AuctionResult};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const YEAR: u64 = 365 * DAY;

fn unit_seconds(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        's' => Some(1),
        'm' => Some(MINUTE),
        'h' => Some(HOUR),
        'd' => Some(DAY),
        'y' => Some(YEAR),
        _ => None,
    }
}

/// Whole-string match of `[0-9]{1,10}[smhdy]`, case-insensitive.
pub fn is_valid_duration(text: &str) -> bool {
    let Some((unit_at, unit)) = text.char_indices().last() else {
        return false;
    };
    let digits = &text[..unit_at];
    unit_seconds(unit).is_some()
        && (1..=10).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Convert a duration string into seconds.
///
/// Only the digit directly before the unit is read, so `"15m"` yields five
/// minutes; configuration strings are written with that convention. An
/// unknown unit, a non-digit in the magnitude position, or input shorter
/// than two characters yields `0`.
pub fn seconds_from_str(text: &str) -> u64 {
    let mut tail = text.chars().rev();
    let (Some(unit), Some(digit)) = (tail.next(), tail.next()) else {
        return 0;
    };
    match (unit_seconds(unit), digit.to_digit(10)) {
        (Some(multiplier), Some(amount)) => u64::from(amount) * multiplier,
        _ => 0,
    }
}

/// A number of seconds split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct RemainingTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

pub const fn remaining_time(total_seconds: u64) -> RemainingTime {
    RemainingTime {
        days: total_seconds / DAY,
        hours: (total_seconds % DAY) / HOUR,
        minutes: (total_seconds % HOUR) / MINUTE,
        seconds: total_seconds % MINUTE,
    }
}

/// Render a millisecond Unix timestamp (UTC) with a strftime pattern.
pub fn format_timestamp(millis: u64, pattern: &str) -> AuctionResult<String> {
    let millis = i64::try_from(millis)
        .map_err(|_| AuctionError::InvalidArgument(format!("timestamp {millis} out of range")))?;
    let at: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AuctionError::InvalidArgument(format!("timestamp {millis} out of range")))?;

    let mut out = String::new();
    write!(out, "{}", at.format(pattern))
        .map_err(|_| AuctionError::Config(format!("invalid date format '{pattern}'")))?;
    Ok(out)
}
