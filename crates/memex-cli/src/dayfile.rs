//! §6.2 append-file format: the human-readable source-of-record mirror of
//! each day's entries. Append idiom grounded on
//! `aigent-memory::event_log::MemoryEventLog::append` (open, create
//! parent dirs, append one record, never rewrite prior content).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use memex_core::errors::{MemexResult, ValidationError};
use memex_core::Entry;

/// Append one entry's block to the day file, writing the day header first
/// if the file doesn't exist yet (§6.2).
pub fn append_entry(path: &Path, date: NaiveDate, entry: &Entry) -> MemexResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    }

    let needs_header = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ValidationError::InvalidPath(e.to_string()))?;

    if needs_header {
        write!(file, "# Context Log: {}\n", date.format("%Y-%m-%d")).map_err(|e| ValidationError::InvalidPath(e.to_string()))?;
    }

    write!(
        file,
        "\n## {} | {} | {}\n<!-- id:{} -->\n{}\n",
        entry.time,
        entry.entry_type.as_str(),
        entry.tags.join(", "),
        entry.id,
        entry.content,
    )
    .map_err(|e| ValidationError::InvalidPath(e.to_string()))?;

    Ok(())
}

/// One parsed section of a day file (§6.2): the fields recoverable purely
/// from the text, without consulting the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    pub time: String,
    pub entry_type: String,
    pub tags: Vec<String>,
    pub id: Option<String>,
    pub content: String,
}

/// Parse a day file's text into its entry sections: split on `^## `, parse
/// the header line, extract `id` from the HTML comment, the remainder is
/// content (§6.2).
pub fn parse_sections(text: &str) -> Vec<ParsedSection> {
    let mut sections = Vec::new();
    for block in text.split("\n## ").skip(1) {
        let mut lines = block.lines();
        let Some(header) = lines.next() else { continue };
        let parts: Vec<&str> = header.splitn(3, " | ").collect();
        if parts.len() != 3 {
            continue;
        }
        let time = parts[0].trim().to_string();
        let entry_type = parts[1].trim().to_string();
        let tags = parts[2]
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let rest: Vec<&str> = lines.collect();
        let mut id = None;
        let mut content_lines = Vec::new();
        for line in rest {
            if let Some(captured) = line.trim().strip_prefix("<!-- id:").and_then(|s| s.strip_suffix(" -->")) {
                id = Some(captured.to_string());
            } else {
                content_lines.push(line);
            }
        }
        let content = content_lines.join("\n").trim().to_string();

        sections.push(ParsedSection {
            time,
            entry_type,
            tags,
            id,
            content,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use memex_core::EntryType;

    #[test]
    fn append_then_parse_roundtrips_header_tags_and_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2026-01-01.md");
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let entry = Entry::new(
            "abc123".to_string(),
            date,
            "09:30".to_string(),
            EntryType::Decision,
            vec!["db".to_string(), "schema".to_string()],
            "Chose SQLite over Postgres for single-user local storage.".to_string(),
            None,
        );
        append_entry(&path, date, &entry).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Context Log: 2026-01-01"));

        let sections = parse_sections(&text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].time, "09:30");
        assert_eq!(sections[0].entry_type, "decision");
        assert_eq!(sections[0].tags, vec!["db", "schema"]);
        assert_eq!(sections[0].id, Some("abc123".to_string()));
        assert!(sections[0].content.contains("SQLite"));
    }

    #[test]
    fn second_append_does_not_repeat_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2026-01-01.md");
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let e1 = Entry::new("a1".into(), date, "09:00".into(), EntryType::Progress, vec![], "first".into(), None);
        let e2 = Entry::new("a2".into(), date, "10:00".into(), EntryType::Progress, vec![], "second".into(), None);
        append_entry(&path, date, &e1).unwrap();
        append_entry(&path, date, &e2).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("# Context Log").count(), 1);
        assert_eq!(parse_sections(&text).len(), 2);
    }
}
