//! The tracker operations the reconciliation engine depends on.

use async_trait::async_trait;
use jira_api::{Issue, JiraClient, Worklog, WorklogPayload, WorklogQuery, WriteReceipt};

/// Issue search and worklog read/write capability of one tracker instance.
///
/// Writes return a receipt for any status the tracker answers with; deciding
/// whether that status counts as success is up to the caller.
#[async_trait]
pub trait WorklogTracker: Send + Sync {
    async fn search_issues(&self, jql: &str, fields: &[&str]) -> jira_api::Result<Vec<Issue>>;

    async fn get_worklogs(&self, issue_key: &str, query: &WorklogQuery) -> jira_api::Result<Vec<Worklog>>;

    async fn create_worklog(&self, issue_key: &str, payload: &WorklogPayload) -> jira_api::Result<WriteReceipt>;

    async fn update_worklog(
        &self,
        issue_key: &str,
        worklog_id: &str,
        payload: &WorklogPayload,
    ) -> jira_api::Result<WriteReceipt>;
}

#[async_trait]
impl WorklogTracker for JiraClient {
    async fn search_issues(&self, jql: &str, fields: &[&str]) -> jira_api::Result<Vec<Issue>> {
        JiraClient::search_issues(self, jql, fields).await
    }

    async fn get_worklogs(&self, issue_key: &str, query: &WorklogQuery) -> jira_api::Result<Vec<Worklog>> {
        JiraClient::get_worklogs(self, issue_key, query).await
    }

    async fn create_worklog(&self, issue_key: &str, payload: &WorklogPayload) -> jira_api::Result<WriteReceipt> {
        JiraClient::create_worklog(self, issue_key, payload).await
    }

    async fn update_worklog(
        &self,
        issue_key: &str,
        worklog_id: &str,
        payload: &WorklogPayload,
    ) -> jira_api::Result<WriteReceipt> {
        JiraClient::update_worklog(self, issue_key, worklog_id, payload).await
    }
}
