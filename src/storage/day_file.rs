//! Per-day log file naming.

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";
const EXTENSION: &str = ".json";

/// File name holding the records of `date`.
pub fn day_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}{}{}", prefix, date.format(DATE_FORMAT), EXTENSION)
}

/// Inverse of [`day_file_name`]. Returns `None` for files that are not
/// per-day logs.
pub fn parse_day_file_name(prefix: &str, name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(prefix)?.strip_suffix(EXTENSION)?;
    // Reject non-canonical forms such as `2024-5-1` so names round-trip.
    if date.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}
