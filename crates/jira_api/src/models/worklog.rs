use chrono::{DateTime, FixedOffset, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::field::{deserialize_comment, deserialize_string_field};
use crate::time::{format_jira_timestamp, parse_jira_timestamp};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPage {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub id: Option<String>,
    #[serde(default)]
    pub author: Option<WorklogAuthor>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub time_spent: Option<String>,
    #[serde(default)]
    pub time_spent_seconds: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_comment")]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    pub account_id: Option<String>,
    pub email_address: Option<String>,
    pub display_name: Option<String>,
}

impl Worklog {
    /// Start instant of the entry; `None` when missing or unparseable.
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        self.started.as_deref().and_then(parse_jira_timestamp)
    }

    pub fn is_authored_by(&self, email: &str) -> bool {
        self.author
            .as_ref()
            .and_then(|author| author.email_address.as_deref())
            .map(|address| address == email)
            .unwrap_or(false)
    }
}

/// Filters for the per-issue worklog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorklogQuery {
    pub started_after: Option<DateTime<Utc>>,
    pub max_results: Option<u32>,
}

impl WorklogQuery {
    pub fn started_after(mut self, instant: DateTime<Utc>) -> Self {
        self.started_after = Some(instant);
        self
    }

    pub fn max_results(mut self, limit: u32) -> Self {
        self.max_results = Some(limit);
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(after) = self.started_after {
            params.push(("startedAfter", after.timestamp_millis().to_string()));
        }
        if let Some(limit) = self.max_results {
            params.push(("maxResults", limit.to_string()));
        }
        params
    }
}

/// Body of a worklog create or update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPayload {
    pub started: String,
    pub time_spent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Document>,
}

impl WorklogPayload {
    /// Builds a payload; a blank comment is left out entirely.
    pub fn new(started: &DateTime<FixedOffset>, time_spent: impl Into<String>, comment: Option<&str>) -> Self {
        let comment = comment
            .filter(|text| !text.trim().is_empty())
            .map(Document::paragraph);
        Self {
            started: format_jira_timestamp(started),
            time_spent: time_spent.into(),
            comment,
        }
    }
}

/// Outcome of a write call: the status Jira answered with and, for creates, the new entry id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub status: StatusCode,
    pub worklog_id: Option<String>,
}

impl WriteReceipt {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            worklog_id: None,
        }
    }

    pub fn with_worklog_id(mut self, id: impl Into<String>) -> Self {
        self.worklog_id = Some(id.into());
        self
    }
}
