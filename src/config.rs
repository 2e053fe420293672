//! YAML configuration model and file-backed loader.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::record::TrackerIdentity;

pub const CONFIG_FILE_NAME: &str = "config.yml";
pub const DEFAULT_WORKLOGS_PER_ISSUE: u32 = 100;

/// Credentials used for the internal tracker and every external one.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Auth {
    pub username: String,
    pub api_token: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectMapping {
    pub external_project_key: String,
    pub internal_issue_key: String,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EpicMapping {
    pub external_epic_key: String,
    pub internal_issue_key: String,
}

/// An external Jira instance and the routing rules for its worklogs.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalJira {
    pub name: String,
    #[serde(rename = "jiraURL")]
    pub jira_url: String,
    pub projects: Vec<ProjectMapping>,
    pub epics: Vec<EpicMapping>,
}

impl ExternalJira {
    pub fn identity(&self) -> TrackerIdentity {
        TrackerIdentity::new(self.jira_url.trim())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pretty_print() -> bool {
    true
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_pretty_print")]
    pub pretty_print_console: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            pretty_print_console: default_pretty_print(),
        }
    }
}

/// Represents the full application configuration read from `config.yml`.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub auth: Auth,
    #[serde(rename = "internalJiraURL")]
    pub internal_jira_url: String,
    pub external: Vec<ExternalJira>,
    /// Resolve and report only, never write to the internal tracker.
    #[serde(rename = "debug", alias = "dryRun")]
    pub dry_run: bool,
    pub worklogs_per_issue: u32,
    pub logger: LoggerConfig,
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|err| SyncError::Configuration(format!("invalid config: {}", err)))
    }

    /// Page size for per-issue worklog listings; zero means the default.
    pub fn worklogs_per_issue(&self) -> u32 {
        if self.worklogs_per_issue == 0 {
            DEFAULT_WORKLOGS_PER_ISSUE
        } else {
            self.worklogs_per_issue
        }
    }

    /// Checks the fields every tracker connection needs.
    pub fn validate(&self) -> Result<()> {
        if self.auth.username.trim().is_empty() {
            return Err(SyncError::Authentication("username is empty".into()));
        }
        if self.auth.api_token.trim().is_empty() {
            return Err(SyncError::Authentication("apiToken is empty".into()));
        }
        if self.internal_jira_url.trim().is_empty() {
            return Err(SyncError::Configuration("internalJiraURL is empty".into()));
        }
        Ok(())
    }
}

/// Reads and parses the configuration file at `path`.
pub fn load(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).map_err(|err| {
        SyncError::Configuration(format!("failed to read {}: {}", path.display(), err))
    })?;
    AppConfig::from_yaml(&content)
}

/// Picks the config file: explicit flag, then next to the executable, then the platform config dir.
pub fn resolve_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }

    let beside_executable = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));
    if let Some(path) = beside_executable.as_ref().filter(|path| path.exists()) {
        return path.clone();
    }

    directories::ProjectDirs::from("dev", "allaboutapps", "worklog-bridge")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
        .or(beside_executable)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
