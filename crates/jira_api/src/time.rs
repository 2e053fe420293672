//! Timestamp helpers for the formats Jira reads and writes.

use chrono::{DateTime, FixedOffset};

/// Write format for worklog `started` values, e.g. `2024-03-05T09:30:00.000+0100`.
pub const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parses a Jira timestamp, keeping the offset it was reported in.
pub fn parse_jira_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .or_else(|| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z").ok())
}

pub fn format_jira_timestamp(value: &DateTime<FixedOffset>) -> String {
    value.format(JIRA_TIMESTAMP_FORMAT).to_string()
}
