//! Create, update or skip: books one worklog record onto an internal issue.

use std::fmt;

use jira_api::{JiraError, StatusCode, Worklog, WorklogPayload, WorklogQuery};
use log::debug;

use crate::error::{Result, SyncError};
use crate::record::WorklogRecord;
use crate::tracker::WorklogTracker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationDecision {
    /// No entry of the user starts at the same instant.
    Create,
    /// An entry starts at the same instant but records a different duration.
    UpdateTimeSpent { worklog_id: String },
    /// An entry with the same start and duration is already booked.
    NoOp { worklog_id: String },
}

impl ReconciliationDecision {
    /// Status the internal tracker must answer with for the write to count as done.
    pub fn expected_status(&self) -> Option<StatusCode> {
        match self {
            ReconciliationDecision::Create => Some(StatusCode::CREATED),
            ReconciliationDecision::UpdateTimeSpent { .. } => Some(StatusCode::OK),
            ReconciliationDecision::NoOp { .. } => None,
        }
    }
}

impl fmt::Display for ReconciliationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationDecision::Create => f.write_str("create"),
            ReconciliationDecision::UpdateTimeSpent { worklog_id } => {
                write!(f, "update time spent of worklog {}", worklog_id)
            }
            ReconciliationDecision::NoOp { .. } => f.write_str("no-op"),
        }
    }
}

/// Compares `record` with the entries already on the internal issue.
///
/// Only entries authored by `username` with a known start are candidates, and
/// they match on the exact start instant. A matching entry without an id
/// cannot be addressed and is an error.
pub fn decide(record: &WorklogRecord, existing: &[Worklog], username: &str) -> Result<ReconciliationDecision> {
    let matched = existing
        .iter()
        .filter(|worklog| worklog.is_authored_by(username))
        .find(|worklog| worklog.started_at() == Some(record.started));

    let Some(worklog) = matched else {
        return Ok(ReconciliationDecision::Create);
    };
    let worklog_id = worklog.id.clone().ok_or_else(|| {
        SyncError::Transport(JiraError::Serialization(format!(
            "booked worklog starting at {} has no id",
            record.started
        )))
    })?;
    if worklog.time_spent_seconds == Some(record.time_spent_seconds) {
        Ok(ReconciliationDecision::NoOp { worklog_id })
    } else {
        Ok(ReconciliationDecision::UpdateTimeSpent { worklog_id })
    }
}

pub struct Reconciler<'a, C: ?Sized> {
    client: &'a C,
    username: &'a str,
}

impl<'a, C> Reconciler<'a, C>
where
    C: WorklogTracker + ?Sized,
{
    pub fn new(client: &'a C, username: &'a str) -> Self {
        Self { client, username }
    }

    /// Decides what to do with `record` and performs the write, if any.
    pub async fn reconcile(&self, issue_key: &str, record: &WorklogRecord) -> Result<ReconciliationDecision> {
        let existing = self
            .client
            .get_worklogs(issue_key, &WorklogQuery::default())
            .await?;
        let decision = decide(record, &existing, self.username)?;
        debug!("{} <- {}: {}", issue_key, record.issue_key, decision);
        self.execute(issue_key, record, &decision).await?;
        Ok(decision)
    }

    async fn execute(
        &self,
        issue_key: &str,
        record: &WorklogRecord,
        decision: &ReconciliationDecision,
    ) -> Result<()> {
        let Some(expected) = decision.expected_status() else {
            return Ok(());
        };

        // The comment always comes from the incoming record, never from the booked entry.
        let payload = WorklogPayload::new(&record.started, record.time_spent.clone(), record.comment.as_deref());
        let receipt = match decision {
            ReconciliationDecision::UpdateTimeSpent { worklog_id } => {
                self.client.update_worklog(issue_key, worklog_id, &payload).await?
            }
            _ => self.client.create_worklog(issue_key, &payload).await?,
        };

        if receipt.status != expected {
            return Err(SyncError::WriteFailed {
                issue_key: issue_key.to_string(),
                decision: decision.clone(),
                status: receipt.status,
            });
        }
        if let Some(id) = receipt.worklog_id.as_deref() {
            debug!("{}: worklog {} written", issue_key, id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TrackerIdentity;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use jira_api::WorklogAuthor;

    const ME: &str = "jane@example.com";

    fn started() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 9, 30, 0)
            .unwrap()
    }

    fn record(seconds: i64) -> WorklogRecord {
        WorklogRecord {
            tracker: TrackerIdentity::new("https://customer-a.atlassian.net"),
            worklog_id: "500".into(),
            issue_key: "CA-7".into(),
            project_key: Some("CA".into()),
            parent_key: None,
            time_spent: format!("{}h", seconds / 3600),
            time_spent_seconds: seconds,
            started: started(),
            comment: None,
        }
    }

    fn booked(id: &str, author: &str, started: Option<&str>, seconds: i64) -> Worklog {
        Worklog {
            id: Some(id.to_string()),
            author: Some(WorklogAuthor {
                email_address: Some(author.to_string()),
                ..WorklogAuthor::default()
            }),
            started: started.map(str::to_string),
            time_spent: None,
            time_spent_seconds: Some(seconds),
            comment: Some("previous comment".into()),
        }
    }

    #[test]
    fn no_entry_at_the_same_instant_creates() {
        let existing = [booked("1", ME, Some("2024-03-05T10:30:00.000+0100"), 3600)];
        assert_eq!(decide(&record(3600), &existing, ME).unwrap(), ReconciliationDecision::Create);
        assert_eq!(decide(&record(3600), &[], ME).unwrap(), ReconciliationDecision::Create);
    }

    #[test]
    fn same_instant_same_seconds_is_a_no_op() {
        let existing = [booked("1", ME, Some("2024-03-05T09:30:00.000+0100"), 3600)];
        assert_eq!(
            decide(&record(3600), &existing, ME).unwrap(),
            ReconciliationDecision::NoOp { worklog_id: "1".into() }
        );
    }

    #[test]
    fn same_instant_other_seconds_updates() {
        let existing = [booked("1", ME, Some("2024-03-05T09:30:00.000+0100"), 3600)];
        assert_eq!(
            decide(&record(7200), &existing, ME).unwrap(),
            ReconciliationDecision::UpdateTimeSpent { worklog_id: "1".into() }
        );
    }

    #[test]
    fn match_is_on_the_instant_not_the_offset() {
        let existing = [booked("7", ME, Some("2024-03-05T08:30:00.000+0000"), 3600)];
        assert_eq!(
            decide(&record(3600), &existing, ME).unwrap(),
            ReconciliationDecision::NoOp { worklog_id: "7".into() }
        );
    }

    #[test]
    fn other_users_entries_never_match() {
        let existing = [booked("1", "john@example.com", Some("2024-03-05T09:30:00.000+0100"), 3600)];
        assert_eq!(decide(&record(3600), &existing, ME).unwrap(), ReconciliationDecision::Create);
    }

    #[test]
    fn entries_without_start_are_ignored() {
        let existing = [booked("1", ME, None, 3600), booked("2", ME, Some("not a date"), 3600)];
        assert_eq!(decide(&record(3600), &existing, ME).unwrap(), ReconciliationDecision::Create);
    }

    #[test]
    fn expected_status_per_decision() {
        assert_eq!(ReconciliationDecision::Create.expected_status(), Some(StatusCode::CREATED));
        assert_eq!(
            ReconciliationDecision::UpdateTimeSpent { worklog_id: "1".into() }.expected_status(),
            Some(StatusCode::OK)
        );
        assert_eq!(ReconciliationDecision::NoOp { worklog_id: "1".into() }.expected_status(), None);
    }

    #[test]
    fn matching_entry_without_id_is_rejected() {
        let mut existing = booked("1", ME, Some("2024-03-05T09:30:00.000+0100"), 3600);
        existing.id = None;
        let err = decide(&record(3600), &[existing], ME).unwrap_err();
        assert!(matches!(err, SyncError::Transport(JiraError::Serialization(_))));
    }

    #[tokio::test]
    async fn forbidden_write_fails_with_issue_and_decision() {
        use jira_api::{Credentials, JiraClient, JiraConfig};
        use mockito::{Matcher, Server};
        use std::time::Duration;

        let mut server = Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/issue/INT-1/worklog")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"worklogs": []}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/rest/api/3/issue/INT-1/worklog")
            .with_status(403)
            .with_body(r#"{"errorMessages": ["You do not have the permission to associate a worklog to this issue."]}"#)
            .create_async()
            .await;

        let config = JiraConfig::new(server.url(), Credentials::new(ME, "s3cret")).with_cooldown(Duration::ZERO);
        let client = JiraClient::new(config).unwrap();
        let err = Reconciler::new(&client, ME)
            .reconcile("INT-1", &record(3600))
            .await
            .unwrap_err();

        match err {
            SyncError::WriteFailed {
                issue_key,
                decision,
                status,
            } => {
                assert_eq!(issue_key, "INT-1");
                assert_eq!(decision, ReconciliationDecision::Create);
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
