//! Atlassian document format, the rich-text shape API v3 expects for comments.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub version: u8,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inline {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl Document {
    /// A document holding one paragraph with the given text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            version: 1,
            kind: "doc",
            content: vec![Block {
                kind: "paragraph",
                content: vec![Inline {
                    kind: "text",
                    text: text.into(),
                }],
            }],
        }
    }
}

/// Flattens a document value into its text, one line per block.
pub(crate) fn plain_text(value: &Value) -> String {
    let mut lines = Vec::new();
    if let Some(blocks) = value.get("content").and_then(Value::as_array) {
        for block in blocks {
            let mut line = String::new();
            collect_text(block, &mut line);
            lines.push(line);
        }
    }
    lines.join("\n")
}

fn collect_text(value: &Value, out: &mut String) {
    if let Some(text) = value.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    if let Some(children) = value.get("content").and_then(Value::as_array) {
        for child in children {
            collect_text(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paragraph_serializes_to_adf() {
        let doc = Document::paragraph("Pairing on the importer");
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "type": "doc",
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": "Pairing on the importer" }]
                }]
            })
        );
    }

    #[test]
    fn plain_text_joins_blocks() {
        let value = json!({
            "type": "doc",
            "version": 1,
            "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "first " },
                    { "type": "text", "text": "line" }
                ]},
                { "type": "paragraph", "content": [{ "type": "text", "text": "second" }] }
            ]
        });
        assert_eq!(plain_text(&value), "first line\nsecond");
    }
}
