//! Routes a worklog record to its internal issue.

use crate::error::SyncError;
use crate::mapping::MappingTable;
use crate::record::{TrackerIdentity, WorklogRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unresolved {
        issue_key: String,
        tracker: TrackerIdentity,
    },
}

impl Resolution {
    pub fn into_result(self) -> Result<String, SyncError> {
        match self {
            Resolution::Resolved(key) => Ok(key),
            Resolution::Unresolved { issue_key, tracker } => {
                Err(SyncError::UnresolvedMapping { issue_key, tracker })
            }
        }
    }
}

/// Project mapping first, epic mapping second. A project rule always wins when both match.
pub fn resolve(table: &MappingTable, record: &WorklogRecord) -> Resolution {
    let by_project = record
        .project_key
        .as_deref()
        .and_then(|key| table.resolve_project(&record.tracker, key));
    let by_epic = || {
        record
            .parent_key
            .as_deref()
            .and_then(|key| table.resolve_epic(&record.tracker, key))
    };

    match by_project.or_else(by_epic) {
        Some(internal) => Resolution::Resolved(internal.to_string()),
        None => Resolution::Unresolved {
            issue_key: record.issue_key.clone(),
            tracker: record.tracker.clone(),
        },
    }
}
