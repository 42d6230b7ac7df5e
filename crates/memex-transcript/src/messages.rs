//! Message extraction (§4.6 "Message extraction", "Filter").

use serde::Deserialize;

use memex_core::constants::TRANSCRIPT_MIN_TEXT_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(rename = "type")]
    kind: String,
    message: RawMessage,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    content: ContentValue,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentValue {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// One extracted message: its role and its extracted text, already past
/// the ≥20 char filter (§4.6 "Filter").
#[derive(Debug, Clone)]
pub struct ExtractedMessage {
    pub role: Role,
    pub text: String,
}

/// Parse one JSONL line and extract its text, applying §4.6's role-specific
/// content rules and the minimum-length filter. Malformed lines and
/// messages that yield no usable text are skipped (`None`), never an
/// error — a single bad line must not abort the scan.
pub fn extract(line: &str) -> Option<ExtractedMessage> {
    let raw: RawLine = serde_json::from_str(line).ok()?;
    let role = match raw.kind.as_str() {
        "user" => Role::User,
        "assistant" => Role::Assistant,
        _ => return None,
    };

    let text = text_of(&raw.message.content, role)?;
    if text.len() < TRANSCRIPT_MIN_TEXT_LEN {
        return None;
    }
    Some(ExtractedMessage { role, text })
}

/// `text_of(content)` (§4.6): string content is trimmed and returned
/// directly; array content is the `\n`-joined text of `{type:"text"}`
/// blocks, skipping `tool_use`/`tool_result`/`thinking`. User messages only
/// consider string content — array content for a user message is always a
/// `tool_result` block and is skipped entirely.
fn text_of(content: &ContentValue, role: Role) -> Option<String> {
    match (content, role) {
        (ContentValue::Text(s), _) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        (ContentValue::Blocks(_), Role::User) => None,
        (ContentValue::Blocks(blocks), Role::Assistant) => {
            let joined = blocks
                .iter()
                .filter(|b| b.kind == "text")
                .filter_map(|b| b.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_content() {
        let line = r#"{"type":"user","message":{"content":"this is a long enough message to pass the filter"}}"#;
        let msg = extract(line).unwrap();
        assert_eq!(msg.role, Role::User);
    }

    #[test]
    fn short_text_is_discarded() {
        let line = r#"{"type":"user","message":{"content":"too short"}}"#;
        assert!(extract(line).is_none());
    }

    #[test]
    fn user_array_content_is_skipped() {
        let line = r#"{"type":"user","message":{"content":[{"type":"tool_result","text":"this is plenty long enough to matter"}]}}"#;
        assert!(extract(line).is_none());
    }

    #[test]
    fn assistant_text_blocks_are_joined() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"text","text":"first part of the response"},{"type":"tool_use","name":"bash"},{"type":"text","text":"second part of the response"}]}}"#;
        let msg = extract(line).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.text.contains("first part"));
        assert!(msg.text.contains("second part"));
    }

    #[test]
    fn thinking_blocks_are_skipped() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"thinking","text":"internal reasoning that is long"}]}}"#;
        assert!(extract(line).is_none());
    }
}
