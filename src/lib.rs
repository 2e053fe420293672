//! Books the worklogs a user keeps in external Jira instances onto the issues
//! of one internal Jira instance.
//!
//! Worklogs are collected per day, routed through project and epic mapping
//! tables, and reconciled against what is already booked so repeated runs for
//! the same day leave the internal tracker unchanged.

pub mod collector;
pub mod config;
pub mod error;
pub mod mapping;
pub mod orchestrator;
pub mod reconciler;
pub mod record;
pub mod report;
pub mod resolver;
pub mod tracker;

pub use config::AppConfig;
pub use error::{Result, SyncError};
pub use mapping::MappingTable;
pub use orchestrator::{ExternalSource, Orchestrator, SyncOptions};
pub use reconciler::{decide, ReconciliationDecision, Reconciler};
pub use record::{TrackerIdentity, WorklogRecord};
pub use report::{LogReporter, ReportLine, SyncReporter, SyncSummary};
pub use resolver::{resolve, Resolution};
pub use tracker::WorklogTracker;
