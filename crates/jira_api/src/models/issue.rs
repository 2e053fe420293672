use serde::Deserialize;

use super::field::deserialize_string_field;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub max_results: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub project: Option<KeyRef>,
    #[serde(default)]
    pub parent: Option<KeyRef>,
}

/// Reference to another Jira entity, as embedded in issue fields.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyRef {
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_field")]
    pub key: Option<String>,
}

impl Issue {
    pub fn project_key(&self) -> Option<&str> {
        self.fields.project.as_ref().and_then(|p| p.key.as_deref())
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.fields.parent.as_ref().and_then(|p| p.key.as_deref())
    }
}
