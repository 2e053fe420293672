//! Normalized worklog records and tracker identities.

use std::fmt;

use chrono::{DateTime, FixedOffset};

/// Base address of an external tracker; partitions the mapping tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackerIdentity(String);

impl TrackerIdentity {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TrackerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One external worklog of the current user, ready to be routed and booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogRecord {
    pub tracker: TrackerIdentity,
    pub worklog_id: String,
    pub issue_key: String,
    pub project_key: Option<String>,
    pub parent_key: Option<String>,
    /// Duration as Jira renders it (`1h 30m`); this form is what gets written.
    pub time_spent: String,
    /// Duration in seconds; this form is what gets compared.
    pub time_spent_seconds: i64,
    pub started: DateTime<FixedOffset>,
    pub comment: Option<String>,
}
