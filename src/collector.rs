//! Collects the current user's worklogs for one day from an external tracker.

use chrono::{DateTime, Local, NaiveDate, Utc};
use jira_api::{Issue, JiraError, Worklog, WorklogQuery};
use log::{debug, trace};

use crate::config::DEFAULT_WORKLOGS_PER_ISSUE;
use crate::error::{Result, SyncError};
use crate::record::{TrackerIdentity, WorklogRecord};
use crate::tracker::WorklogTracker;

pub const DAY_FORMAT: &str = "%Y-%m-%d";
const ISSUE_FIELDS: &[&str] = &["project", "parent"];

/// JQL selecting issues the current user logged time on during `date`.
pub fn worklog_search_jql(date: NaiveDate) -> String {
    format!(
        "worklogDate = {} AND worklogAuthor = currentUser()",
        date.format(DAY_FORMAT)
    )
}

/// Local midnight at the start of `date`, as an absolute instant.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

pub struct WorklogCollector<'a, C: ?Sized> {
    client: &'a C,
    tracker: &'a TrackerIdentity,
    username: &'a str,
    page_size: u32,
}

impl<'a, C> WorklogCollector<'a, C>
where
    C: WorklogTracker + ?Sized,
{
    pub fn new(client: &'a C, tracker: &'a TrackerIdentity, username: &'a str) -> Self {
        Self {
            client,
            tracker,
            username,
            page_size: DEFAULT_WORKLOGS_PER_ISSUE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_WORKLOGS_PER_ISSUE
        } else {
            page_size
        };
        self
    }

    /// Returns the user's worklogs starting on `date`, in issue-search then listing order.
    pub async fn collect(&self, date: NaiveDate) -> Result<Vec<WorklogRecord>> {
        let day = date.format(DAY_FORMAT).to_string();
        let issues = self
            .client
            .search_issues(&worklog_search_jql(date), ISSUE_FIELDS)
            .await?;
        debug!("{}: {} issue(s) with worklogs on {}", self.tracker, issues.len(), day);

        let query = WorklogQuery::default()
            .started_after(start_of_day(date))
            .max_results(self.page_size);

        let mut records = Vec::new();
        for issue in &issues {
            let worklogs = self.client.get_worklogs(&issue.key, &query).await?;
            for worklog in worklogs {
                if let Some(record) = self.normalize(issue, worklog, &day)? {
                    records.push(record);
                }
            }
        }

        Ok(records)
    }

    fn normalize(&self, issue: &Issue, worklog: Worklog, day: &str) -> Result<Option<WorklogRecord>> {
        if !worklog.is_authored_by(self.username) {
            trace!("{}: skipping worklog of another user", issue.key);
            return Ok(None);
        }
        let Some(started) = worklog.started_at() else {
            trace!("{}: skipping worklog without start", issue.key);
            return Ok(None);
        };
        if started.format(DAY_FORMAT).to_string() != day {
            return Ok(None);
        }

        let project_key = issue.project_key().map(str::to_string);
        let parent_key = issue.parent_key().map(str::to_string);
        if project_key.is_none() && parent_key.is_none() {
            return Err(SyncError::MissingProjectOrParent {
                issue_key: issue.key.clone(),
                tracker: self.tracker.clone(),
            });
        }

        let worklog_id = worklog.id.ok_or_else(|| malformed(issue, "id"))?;
        let time_spent = worklog
            .time_spent
            .filter(|spent| !spent.trim().is_empty())
            .ok_or_else(|| malformed(issue, "timeSpent"))?;
        let time_spent_seconds = worklog
            .time_spent_seconds
            .ok_or_else(|| malformed(issue, "timeSpentSeconds"))?;

        Ok(Some(WorklogRecord {
            tracker: self.tracker.clone(),
            worklog_id,
            issue_key: issue.key.clone(),
            project_key,
            parent_key,
            time_spent,
            time_spent_seconds,
            started,
            comment: worklog.comment,
        }))
    }
}

fn malformed(issue: &Issue, field: &str) -> SyncError {
    SyncError::Transport(JiraError::Serialization(format!(
        "worklog of {} has no {}",
        issue.key, field
    )))
}
