//! Routing tables from external project and epic keys to internal issues.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::config::ExternalJira;
use crate::error::{Result, SyncError};
use crate::record::TrackerIdentity;

type MappingKey = (TrackerIdentity, String);

/// Immutable project and epic lookup tables, keyed by tracker and external key.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    projects: HashMap<MappingKey, String>,
    epics: HashMap<MappingKey, String>,
}

impl MappingTable {
    /// Builds both tables, rejecting empty fields and duplicate keys.
    pub fn from_config(externals: &[ExternalJira]) -> Result<Self> {
        let mut table = Self::default();

        for (index, external) in externals.iter().enumerate() {
            let tracker = external.identity();
            if tracker.is_empty() {
                return Err(SyncError::Configuration(format!(
                    "external[{}].jiraURL is empty for {}",
                    index, external.name
                )));
            }

            for (i, project) in external.projects.iter().enumerate() {
                let field = |name: &str| format!("projects[{}].{} is empty for {}", i, name, external.name);
                require(&project.external_project_key, || field("externalProjectKey"))?;
                require(&project.internal_issue_key, || field("internalIssueKey"))?;
                insert_unique(
                    &mut table.projects,
                    (tracker.clone(), project.external_project_key.trim().to_string()),
                    project.internal_issue_key.trim(),
                    "project",
                )?;
            }

            for (i, epic) in external.epics.iter().enumerate() {
                let field = |name: &str| format!("epics[{}].{} is empty for {}", i, name, external.name);
                require(&epic.external_epic_key, || field("externalEpicKey"))?;
                require(&epic.internal_issue_key, || field("internalIssueKey"))?;
                insert_unique(
                    &mut table.epics,
                    (tracker.clone(), epic.external_epic_key.trim().to_string()),
                    epic.internal_issue_key.trim(),
                    "epic",
                )?;
            }
        }

        Ok(table)
    }

    pub fn resolve_project(&self, tracker: &TrackerIdentity, project_key: &str) -> Option<&str> {
        lookup(&self.projects, tracker, project_key)
    }

    pub fn resolve_epic(&self, tracker: &TrackerIdentity, epic_key: &str) -> Option<&str> {
        lookup(&self.epics, tracker, epic_key)
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn epic_count(&self) -> usize {
        self.epics.len()
    }
}

fn lookup<'a>(
    table: &'a HashMap<MappingKey, String>,
    tracker: &TrackerIdentity,
    key: &str,
) -> Option<&'a str> {
    table
        .get(&(tracker.clone(), key.to_string()))
        .map(String::as_str)
}

fn require(value: &str, message: impl FnOnce() -> String) -> Result<()> {
    if value.trim().is_empty() {
        Err(SyncError::Configuration(message()))
    } else {
        Ok(())
    }
}

fn insert_unique(
    table: &mut HashMap<MappingKey, String>,
    key: MappingKey,
    internal_issue_key: &str,
    kind: &str,
) -> Result<()> {
    match table.entry(key) {
        Entry::Occupied(existing) => {
            let (tracker, external_key) = existing.key();
            Err(SyncError::Configuration(format!(
                "duplicate {} mapping for {} on {}",
                kind, external_key, tracker
            )))
        }
        Entry::Vacant(slot) => {
            slot.insert(internal_issue_key.to_string());
            Ok(())
        }
    }
}
