use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::Value;

use super::document::plain_text;

/// Accepts strings, numbers and booleans as an optional string; blank values become `None`.
pub(crate) fn deserialize_string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|val| match val {
        Value::String(text) => non_blank(&text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

/// Worklog comments are plain strings in API v2 and rich-text documents in v3.
pub(crate) fn deserialize_comment<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|val| match val {
        Value::String(text) => Some(text).filter(|text| !text.trim().is_empty()),
        Value::Object(_) => Some(plain_text(&val)).filter(|text| !text.trim().is_empty()),
        _ => None,
    }))
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
