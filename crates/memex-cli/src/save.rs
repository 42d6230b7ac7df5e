//! The entry-save contract (§6.5): append to the day file, insert the row
//! and its vector, run the issue pattern hook, report back what happened.

use serde::Serialize;

use memex_core::errors::MemexResult;
use memex_core::{Entry, EntryType, Tier};
use memex_patterns::on_issue_saved;

use crate::dayfile;
use crate::engine::MemexEngine;

#[derive(Debug, Clone, Serialize)]
pub struct SaveResult {
    pub id: String,
    pub date: String,
    pub time: String,
    pub tier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_detected: Option<String>,
}

#[allow(clippy::too_many_arguments)]
pub fn save(
    engine: &MemexEngine,
    entry_type: EntryType,
    content: String,
    tags: Vec<String>,
    tier: Option<Tier>,
    pinned: Option<bool>,
    agent_id: Option<String>,
    label: Option<String>,
    project: Option<String>,
) -> MemexResult<SaveResult> {
    let today = engine.today();
    let time = engine.clock.time_hhmm();
    let id = engine.clock.mint_id();

    let mut entry = Entry::new(id.clone(), today, time.clone(), entry_type, tags, content, tier);
    entry.source_file = None;
    entry.label = label;
    entry.project = project;
    entry.session_id = Some(engine.clock.session_id().to_string());
    entry.agent_id = agent_id;
    if let Some(p) = pinned {
        entry.pinned = p;
    }
    entry.validate()?;

    dayfile::append_entry(&engine.layout.context_file(today), today, &entry)?;

    let row_id = engine.store.insert(&entry)?;
    let vector = engine.embed.embed(&entry.content);
    engine.store.insert_vec(row_id, &vector)?;

    let pattern_detected = if entry.entry_type == EntryType::Issue {
        on_issue_saved(&engine.store, &entry, &vector, &engine.clock, today)?
    } else {
        None
    };

    Ok(SaveResult {
        id: entry.id,
        date: today.format("%Y-%m-%d").to_string(),
        time,
        tier: entry.tier.as_str().to_string(),
        pattern_detected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_inserts_entry_and_returns_contract_shape() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();

        let result = save(
            &engine,
            EntryType::Decision,
            "Chose SQLite for local storage.".to_string(),
            vec!["db".to_string()],
            None,
            None,
            None,
            None,
            None,
        )
        .unwrap();

        assert!(!result.id.is_empty());
        assert_eq!(result.tier, "working");
        assert!(result.pattern_detected.is_none());

        let stored = engine.store.get_by_id(&result.id).unwrap().unwrap();
        assert_eq!(stored.content, "Chose SQLite for local storage.");

        let day_file = engine.layout.context_file(engine.today());
        let text = std::fs::read_to_string(day_file).unwrap();
        assert!(text.contains(&result.id));
    }

    #[test]
    fn save_rejects_a_rule_without_a_label() {
        let dir = tempfile::tempdir().unwrap();
        let engine = MemexEngine::open(dir.path().to_path_buf()).unwrap();

        let err = save(
            &engine,
            EntryType::Rule,
            "use tabs not spaces".to_string(),
            vec![],
            None,
            None,
            None,
            None,
            None,
        );
        assert!(err.is_err());
    }
}
