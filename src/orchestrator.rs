//! Drives collection, routing and booking for one day across all external trackers.

use chrono::NaiveDate;
use jira_api::{Credentials, JiraClient, JiraConfig};
use log::debug;

use crate::collector::WorklogCollector;
use crate::config::AppConfig;
use crate::error::{Result, SyncError};
use crate::mapping::MappingTable;
use crate::reconciler::{ReconciliationDecision, Reconciler};
use crate::record::{TrackerIdentity, WorklogRecord};
use crate::report::{ReportLine, SyncReporter, SyncSummary};
use crate::resolver::resolve;
use crate::tracker::WorklogTracker;

/// An external tracker together with the client used to read from it.
pub struct ExternalSource<C> {
    pub name: String,
    pub tracker: TrackerIdentity,
    pub client: C,
}

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Author email identifying the current user's worklogs on every tracker.
    pub username: String,
    pub dry_run: bool,
    pub worklogs_per_issue: u32,
}

pub struct Orchestrator<C> {
    mapping: MappingTable,
    internal: C,
    externals: Vec<ExternalSource<C>>,
    options: SyncOptions,
}

impl Orchestrator<JiraClient> {
    /// Validates the configuration and connects a client per tracker.
    ///
    /// Credentials are checked before anything else is built, and the mapping
    /// tables before any client exists.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let mapping = MappingTable::from_config(&config.external)?;
        debug!(
            "loaded {} project and {} epic mapping(s)",
            mapping.project_count(),
            mapping.epic_count()
        );

        let credentials = Credentials::new(config.auth.username.trim(), config.auth.api_token.trim());
        let internal = JiraClient::new(JiraConfig::new(config.internal_jira_url.trim(), credentials.clone()))?;
        let externals = config
            .external
            .iter()
            .map(|external| -> Result<ExternalSource<JiraClient>> {
                let tracker = external.identity();
                let client = JiraClient::new(JiraConfig::new(tracker.as_str(), credentials.clone()))?;
                Ok(ExternalSource {
                    name: external.name.clone(),
                    tracker,
                    client,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let options = SyncOptions {
            username: config.auth.username.trim().to_string(),
            dry_run: config.dry_run,
            worklogs_per_issue: config.worklogs_per_issue(),
        };
        Ok(Self::new(mapping, internal, externals, options))
    }
}

impl<C> Orchestrator<C>
where
    C: WorklogTracker,
{
    pub fn new(mapping: MappingTable, internal: C, externals: Vec<ExternalSource<C>>, options: SyncOptions) -> Self {
        Self {
            mapping,
            internal,
            externals,
            options,
        }
    }

    /// Books every worklog of `date` from all external trackers, in configuration order.
    ///
    /// Stops at the first error; entries written before it stay booked and
    /// reconcile as unchanged on the next run.
    pub async fn synchronize_day(&self, date: NaiveDate, reporter: &mut dyn SyncReporter) -> Result<SyncSummary> {
        let reconciler = Reconciler::new(&self.internal, &self.options.username);
        let mut summary = SyncSummary::default();

        for source in &self.externals {
            debug!("collecting worklogs of {} from {} ({})", date, source.name, source.tracker);
            let records = WorklogCollector::new(&source.client, &source.tracker, &self.options.username)
                .with_page_size(self.options.worklogs_per_issue)
                .collect(date)
                .await?;

            for record in &records {
                let (internal_issue_key, decision) = self
                    .book(&reconciler, record)
                    .await
                    .map_err(|err| in_record(record, err))?;

                reporter.report(&ReportLine {
                    internal_issue_key,
                    external_issue_key: record.issue_key.clone(),
                    time_spent: record.time_spent.clone(),
                    decision: decision.clone(),
                });
                summary.record(decision.as_ref());
            }
        }

        Ok(summary)
    }

    async fn book(
        &self,
        reconciler: &Reconciler<'_, C>,
        record: &WorklogRecord,
    ) -> Result<(String, Option<ReconciliationDecision>)> {
        let internal_issue_key = resolve(&self.mapping, record).into_result()?;
        if self.options.dry_run {
            return Ok((internal_issue_key, None));
        }
        let decision = reconciler.reconcile(&internal_issue_key, record).await?;
        Ok((internal_issue_key, Some(decision)))
    }
}

fn in_record(record: &WorklogRecord, err: SyncError) -> SyncError {
    SyncError::Record {
        tracker: record.tracker.clone(),
        issue_key: record.issue_key.clone(),
        worklog_id: record.worklog_id.clone(),
        source: Box::new(err),
    }
}
