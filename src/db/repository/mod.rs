pub mod parsed;
pub mod token;
pub mod upcoming;
pub mod user;

use chrono::NaiveDateTime;

/// Parse a stored timestamp, tolerating both space- and T-separated forms.
pub(crate) fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .unwrap_or_default()
}

/// Format a timestamp the way every table stores it.
pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
