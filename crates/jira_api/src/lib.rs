//! Typed Jira REST client crate used by the worklog bridge.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limiter;
pub mod time;

pub use auth::Credentials;
pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{JiraError, Result};
pub use models::{
    Document, Issue, IssueFields, KeyRef, SearchResults, Worklog, WorklogAuthor, WorklogPage,
    WorklogPayload, WorklogQuery, WriteReceipt,
};
pub use reqwest::StatusCode;
