//! Clock text <-> millisecond conversion.
//!
//! Decoding accepts the timer's export format `H:MM:SS` with an optional
//! `.fff` fraction. Encoding produces the compact display format used in
//! the dashboard table, whose width depends on the magnitude:
//!
//! | value          | display      |
//! |----------------|--------------|
//! | under a minute | `SS.d`       |
//! | under an hour  | `MM:SS.d`    |
//! | otherwise      | `HH:MM:SS.d` |
//!
//! The trailing `d` is the last decimal digit of the millisecond count,
//! not tenths of a second. Encoding is therefore not an inverse of
//! decoding.

use crate::error::TimeError;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Number of fractional digits kept when decoding.
const FRACTION_DIGITS: usize = 3;

fn malformed(input: &str, reason: impl Into<String>) -> TimeError {
    TimeError::Malformed {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_field(input: &str, name: &str, field: &str) -> Result<u64, TimeError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(input, format!("{} field '{}' is not a number", name, field)));
    }
    field
        .parse::<u64>()
        .map_err(|_| malformed(input, format!("{} field '{}' is out of range", name, field)))
}

/// Fractional seconds as milliseconds: the first three digits are read
/// as an integer, so a shorter fraction counts units of a millisecond
/// (`"5"` and `"05"` are both 5 ms, `"500"` is 500 ms).
fn parse_fraction(input: &str, fraction: &str) -> Result<u64, TimeError> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(
            input,
            format!("fraction '{}' is not a number", fraction),
        ));
    }
    let digits: String = fraction.chars().take(FRACTION_DIGITS).collect();
    parse_field(input, "fraction", &digits)
}

/// Decode `H:MM:SS` or `H:MM:SS.fff` into milliseconds.
///
/// Fields are not range-checked: `0:00:61` decodes to 61 000.
pub fn decode(text: &str) -> Result<u64, TimeError> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() != 3 {
        return Err(malformed(
            text,
            format!("expected 3 colon-separated fields, found {}", fields.len()),
        ));
    }

    let (seconds, fraction) = match fields[2].split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (fields[2], None),
    };

    let hours = parse_field(text, "hours", fields[0])?;
    let minutes = parse_field(text, "minutes", fields[1])?;
    let seconds = parse_field(text, "seconds", seconds)?;
    let millis = match fraction {
        Some(fraction) => parse_fraction(text, fraction)?,
        None => 0,
    };

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes.checked_mul(MS_PER_MINUTE)?))
        .and_then(|total| total.checked_add(seconds.checked_mul(MS_PER_SECOND)?))
        .and_then(|total| total.checked_add(millis))
        .ok_or_else(|| malformed(text, "value overflows the millisecond range"))
}

/// Encode milliseconds into the dashboard display format.
pub fn encode(millis: u64) -> String {
    let total_seconds = millis / MS_PER_SECOND;
    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let seconds = total_seconds % 60;
    let digit = millis % 10;

    if hours == 0 {
        if minutes == 0 {
            return format!("{:02}.{}", seconds, digit);
        }
        return format!("{:02}:{:02}.{}", minutes, seconds, digit);
    }
    format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, digit)
}

/// Decode then re-encode, for values that are displayed as supplied.
pub fn reformat(text: &str) -> Result<String, TimeError> {
    decode(text).map(encode)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
