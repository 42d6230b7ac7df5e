//! Capture logic driven off extracted messages (§4.6 "Semantic
//! classification", "Directive detection", "Debugging-pattern capture").

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use memex_core::constants::{
    DEBUGGING_LOOKBACK_MESSAGES, DEDUP_L2_THRESHOLD, TRANSCRIPT_ASSISTANT_CATEGORY_THRESHOLD,
    TRANSCRIPT_USER_INTENT_THRESHOLD,
};
use memex_core::errors::MemexResult;
use memex_core::{Clock, Entry, EntryType, Tier};
use memex_embed::{EmbeddingEngine, TemplateSet};
use memex_storage::queries::entry_crud::ListFilter;
use memex_storage::StorageEngine;

use crate::messages::{ExtractedMessage, Role};

const DIRECTIVE_DEDUP_COSINE: f32 = 0.75;
/// Minimum similarity for the anchor/directive semantic half of the
/// combined directive gate (§4.6.1's regex half is `passes_directive_gate`).
const DIRECTIVE_SEMANTIC_THRESHOLD: f32 = 0.5;

fn new_entry(
    clock: &Clock,
    today: NaiveDate,
    entry_type: EntryType,
    tags: Vec<String>,
    content: String,
    tier: Tier,
) -> Entry {
    let mut entry = Entry::new(
        clock.mint_id(),
        today,
        clock.time_hhmm(),
        entry_type,
        tags,
        content,
        Some(tier),
    );
    entry.source_file = Some("transcript-scan".to_string());
    entry
}

/// Semantic classification capture (§4.6). Returns the new entry id, if
/// one was inserted.
pub fn capture_classification(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    msg: &ExtractedMessage,
    clock: &Clock,
    today: NaiveDate,
) -> MemexResult<Option<String>> {
    let (set, threshold) = match msg.role {
        Role::User => (TemplateSet::Intent, TRANSCRIPT_USER_INTENT_THRESHOLD),
        Role::Assistant => (TemplateSet::Category, TRANSCRIPT_ASSISTANT_CATEGORY_THRESHOLD),
    };

    let classification = match embed.classify(&msg.text, set, threshold) {
        Some(c) => c,
        None => return Ok(None),
    };

    let v = embed.embed(&msg.text);
    let nearest = store.search_vec(&v, 1)?;
    if nearest.first().map(|(_, dist)| *dist < DEDUP_L2_THRESHOLD).unwrap_or(false) {
        return Ok(None);
    }

    let role_str = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    let tags = vec![
        "transcript-scan".to_string(),
        format!("source:{role_str}"),
        format!("intent:{}", classification.category),
    ];
    let entry = new_entry(clock, today, EntryType::Insight, tags, msg.text.clone(), Tier::Working);
    let row_id = store.insert(&entry)?;
    store.insert_vec(row_id, &v)?;
    Ok(Some(entry.id))
}

/// Directive detection (§4.6). Only applies to user messages.
pub fn capture_directive(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    msg: &ExtractedMessage,
    clock: &Clock,
    today: NaiveDate,
) -> MemexResult<Option<String>> {
    if msg.role != Role::User {
        return Ok(None);
    }

    let anchor = match embed.classify(&msg.text, TemplateSet::Anchor, DIRECTIVE_SEMANTIC_THRESHOLD) {
        Some(c) => c,
        None => return Ok(None),
    };
    if embed.classify(&msg.text, TemplateSet::Directive, DIRECTIVE_SEMANTIC_THRESHOLD).is_none() {
        return Ok(None);
    }

    let signal = crate::signal::score(&msg.text);
    if !signal.passes_directive_gate() {
        return Ok(None);
    }

    let v_msg = embed.embed(&msg.text);
    if max_cosine_against_rule_like(store, &v_msg, today)? >= DIRECTIVE_DEDUP_COSINE {
        return Ok(None);
    }

    let tags = vec![
        "pending_rule".to_string(),
        format!("proposed-label:{}", slug(&truncate_chars(&msg.text, 40))),
        format!("anchor:{}", anchor.category),
    ];
    let entry = new_entry(clock, today, EntryType::Insight, tags, msg.text.clone(), Tier::Working);
    let row_id = store.insert(&entry)?;
    store.insert_vec(row_id, &v_msg)?;
    Ok(Some(entry.id))
}

/// Debugging-pattern capture (§4.6): scans a windowed batch of messages,
/// looking back up to `DEBUGGING_LOOKBACK_MESSAGES` from each assistant
/// "resolution" message for a preceding "error" message.
pub fn capture_debugging_patterns(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    window: &[ExtractedMessage],
    clock: &Clock,
    today: NaiveDate,
) -> MemexResult<Vec<String>> {
    let mut captured = Vec::new();
    for (i, msg) in window.iter().enumerate() {
        if msg.role != Role::Assistant || !resolution_regex().is_match(&msg.text) {
            continue;
        }
        let start = i.saturating_sub(DEBUGGING_LOOKBACK_MESSAGES);
        let error_msg = window[start..i].iter().find(|m| error_regex().is_match(&m.text));
        let Some(error_msg) = error_msg else {
            continue;
        };

        let content = format!("Failed attempt: {}\n\nResolution: {}", error_msg.text, msg.text);
        let v = embed.embed(&content);
        let nearest = store.search_vec(&v, 1)?;
        if nearest.first().map(|(_, dist)| *dist < DEDUP_L2_THRESHOLD).unwrap_or(false) {
            continue;
        }

        let tags = vec![
            "debugging-pattern".to_string(),
            "transcript-scan".to_string(),
            "auto-captured".to_string(),
        ];
        let entry = new_entry(clock, today, EntryType::Insight, tags, content, Tier::LongTerm);
        let row_id = store.insert(&entry)?;
        store.insert_vec(row_id, &v)?;
        captured.push(entry.id);
    }
    Ok(captured)
}

/// Max cosine similarity of `v` against every existing rule or
/// `pending_rule`-tagged entry's vector. Vectors are unit-norm, so cosine is
/// a plain dot product. Entries with no vector stored are skipped.
fn max_cosine_against_rule_like(store: &StorageEngine, v: &[f32], today: NaiveDate) -> MemexResult<f32> {
    let mut candidates = store.list_with_rowids(ListFilter {
        entry_type: Some(EntryType::Rule),
        days: None,
        include_archived: false,
        today,
    })?;
    let insights = store.list_with_rowids(ListFilter {
        entry_type: Some(EntryType::Insight),
        days: None,
        include_archived: false,
        today,
    })?;
    candidates.extend(insights.into_iter().filter(|(_, e)| e.tags.iter().any(|t| t == "pending_rule")));

    let mut best = 0.0f32;
    for (row_id, _) in candidates {
        if let Some(stored) = store.get_vec(row_id)? {
            let sim = memex_embed::dot(v, &stored);
            if sim > best {
                best = sim;
            }
        }
    }
    Ok(best)
}

fn truncate_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn slug(s: &str) -> String {
    let mut out = String::new();
    let mut last_was_dash = false;
    for c in s.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_was_dash = false;
        } else if !last_was_dash && !out.is_empty() {
            out.push('-');
            last_was_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn resolution_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(fix was|solution is|the issue was|root cause|now works|resolved by|the problem was)\b")
            .expect("resolution regex is valid")
    })
}

fn error_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(error|failed|doesn't work|ENOENT|EACCES|EPERM|TypeError|ReferenceError|SyntaxError|exit code [1-9]|command not found)\b",
        )
        .expect("error regex is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_punctuation() {
        assert_eq!(slug("Always use Tabs, not Spaces!"), "always-use-tabs-not-spaces");
    }

    #[test]
    fn resolution_and_error_regexes_match_expected_phrases() {
        assert!(resolution_regex().is_match("the root cause was a stale lock"));
        assert!(error_regex().is_match("got a TypeError when running the build"));
    }
}
