mod document;
mod field;
mod issue;
mod worklog;

pub use document::Document;
pub use issue::{Issue, IssueFields, KeyRef, SearchResults};
pub use worklog::{Worklog, WorklogAuthor, WorklogPage, WorklogPayload, WorklogQuery, WriteReceipt};
