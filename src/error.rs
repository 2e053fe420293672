//! Errors that end a synchronization run.

use jira_api::{JiraError, StatusCode};
use thiserror::Error;

use crate::record::TrackerIdentity;
use crate::reconciler::ReconciliationDecision;

pub type Result<T> = std::result::Result<T, SyncError>;

/// Every variant is fatal: the first one raised aborts the whole run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("transport error: {0}")]
    Transport(#[source] JiraError),
    #[error("issue {issue_key} on {tracker} has no project and no parent")]
    MissingProjectOrParent {
        issue_key: String,
        tracker: TrackerIdentity,
    },
    #[error("no project or epic mapping configured for issue {issue_key} on {tracker}")]
    UnresolvedMapping {
        issue_key: String,
        tracker: TrackerIdentity,
    },
    #[error("{decision} on {issue_key} failed with status {status}")]
    WriteFailed {
        issue_key: String,
        decision: ReconciliationDecision,
        status: StatusCode,
    },
    #[error("worklog {worklog_id} of {issue_key} on {tracker}: {source}")]
    Record {
        tracker: TrackerIdentity,
        issue_key: String,
        worklog_id: String,
        #[source]
        source: Box<SyncError>,
    },
}

impl SyncError {
    /// Strips record context, returning the error that actually occurred.
    pub fn root_cause(&self) -> &SyncError {
        match self {
            SyncError::Record { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<JiraError> for SyncError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::Authentication(message) => SyncError::Authentication(message),
            other => SyncError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jira_auth_failures_surface_as_authentication() {
        let err = SyncError::from(JiraError::Authentication("Access denied (401)".into()));
        assert!(matches!(err, SyncError::Authentication(_)));

        let err = SyncError::from(JiraError::http(StatusCode::BAD_GATEWAY, "upstream"));
        assert!(matches!(err, SyncError::Transport(_)));
    }

    #[test]
    fn root_cause_unwraps_nested_record_context() {
        let tracker = TrackerIdentity::new("https://customer-a.atlassian.net");
        let err = SyncError::Record {
            tracker: tracker.clone(),
            issue_key: "CA-7".into(),
            worklog_id: "500".into(),
            source: Box::new(SyncError::UnresolvedMapping {
                issue_key: "CA-7".into(),
                tracker,
            }),
        };
        assert!(matches!(err.root_cause(), SyncError::UnresolvedMapping { .. }));
        assert!(err.to_string().starts_with("worklog 500 of CA-7 on https://customer-a.atlassian.net"));
    }
}
