//! Per-worklog report lines and the end-of-run summary.

use std::fmt;

use log::info;

use crate::reconciler::ReconciliationDecision;

/// One reconciled worklog: where it went and how much time it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub internal_issue_key: String,
    pub external_issue_key: String,
    pub time_spent: String,
    /// `None` in dry runs, where nothing is compared or written.
    pub decision: Option<ReconciliationDecision>,
}

/// Receives one line per reconciled worklog, including unchanged ones.
pub trait SyncReporter {
    fn report(&mut self, line: &ReportLine);
}

/// Writes each line to the `info` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl SyncReporter for LogReporter {
    fn report(&mut self, line: &ReportLine) {
        info!("issue={} timeSpent={}", line.internal_issue_key, line.time_spent);
    }
}

/// Collects lines in memory.
impl SyncReporter for Vec<ReportLine> {
    fn report(&mut self, line: &ReportLine) {
        self.push(line.clone());
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub previewed: usize,
}

impl SyncSummary {
    pub fn record(&mut self, decision: Option<&ReconciliationDecision>) {
        match decision {
            Some(ReconciliationDecision::Create) => self.created += 1,
            Some(ReconciliationDecision::UpdateTimeSpent { .. }) => self.updated += 1,
            Some(ReconciliationDecision::NoOp { .. }) => self.unchanged += 1,
            None => self.previewed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.previewed
    }

    pub fn writes(&self) -> usize {
        self.created + self.updated
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} worklog(s): {} created, {} updated, {} unchanged, {} previewed",
            self.total(),
            self.created,
            self.updated,
            self.unchanged,
            self.previewed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_decision() {
        let mut summary = SyncSummary::default();
        summary.record(Some(&ReconciliationDecision::Create));
        summary.record(Some(&ReconciliationDecision::UpdateTimeSpent { worklog_id: "1".into() }));
        summary.record(Some(&ReconciliationDecision::NoOp { worklog_id: "2".into() }));
        summary.record(Some(&ReconciliationDecision::NoOp { worklog_id: "3".into() }));
        summary.record(None);

        assert_eq!(summary.total(), 5);
        assert_eq!(summary.writes(), 2);
        assert_eq!(
            summary.to_string(),
            "5 worklog(s): 1 created, 1 updated, 2 unchanged, 1 previewed"
        );
    }

    #[test]
    fn vec_reporter_keeps_lines_in_order() {
        let mut lines: Vec<ReportLine> = Vec::new();
        for key in ["INT-1", "INT-2"] {
            lines.report(&ReportLine {
                internal_issue_key: key.into(),
                external_issue_key: "CA-7".into(),
                time_spent: "1h".into(),
                decision: None,
            });
        }
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].internal_issue_key, "INT-2");
    }
}
