//! Human-facing formatting: durations, timestamps and money.

pub mod duration;
pub mod magnitude;

pub use duration::{
    format_timestamp, is_valid_duration, remaining_time, seconds_from_str, RemainingTime,
};
pub use magnitude::{format_currency, friendly_number};
