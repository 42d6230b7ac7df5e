//! Orchestration: one `scan()` call performs one incremental pass over the
//! active transcript file (§4.6).

use std::path::Path;

use memex_core::config::TranscriptConfig;
use memex_core::constants::TRANSCRIPT_MAX_MESSAGES_PER_SCAN;
use memex_core::errors::MemexResult;
use memex_core::{Clock, TranscriptCursor};
use memex_embed::EmbeddingEngine;
use memex_storage::StorageEngine;

use crate::capture;
use crate::messages::{self, ExtractedMessage};
use crate::reader;

/// Summary of one scan, for logging at the call site.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub messages_considered: usize,
    pub classifications_captured: usize,
    pub directives_captured: usize,
    pub debugging_patterns_captured: usize,
}

/// Run one incremental scan: locate the active transcript file, read a
/// chunk past the persisted cursor, extract and cap messages, then run
/// classification, directive detection and debugging-pattern capture over
/// the batch (§4.6).
pub fn scan(
    store: &StorageEngine,
    embed: &EmbeddingEngine,
    transcript_dir: &Path,
    cursor_path: &Path,
    cfg: &TranscriptConfig,
    clock: &Clock,
) -> MemexResult<ScanReport> {
    let active_file = reader::most_recent_jsonl(transcript_dir)?;
    let file_name = active_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let existing = reader::load_cursor(cursor_path);
    let cursor = match existing {
        Some(c) if c.file == file_name => c,
        _ => TranscriptCursor::reset(file_name.clone()),
    };

    let chunk = reader::read_chunk(&active_file, cursor.offset, cfg.max_chunk_bytes)?;
    reader::save_cursor(cursor_path, &TranscriptCursor::new(file_name, chunk.new_offset))?;

    let max_messages = cfg.max_messages_per_scan.min(TRANSCRIPT_MAX_MESSAGES_PER_SCAN);
    let extracted: Vec<ExtractedMessage> = chunk
        .lines
        .iter()
        .filter_map(|line| messages::extract(line))
        .take(max_messages)
        .collect();

    let today = clock.today_local_ymd();
    let mut report = ScanReport {
        messages_considered: extracted.len(),
        ..Default::default()
    };

    for msg in &extracted {
        if capture::capture_classification(store, embed, msg, clock, today)?.is_some() {
            report.classifications_captured += 1;
        }
        if capture::capture_directive(store, embed, msg, clock, today)?.is_some() {
            report.directives_captured += 1;
        }
    }

    let captured = capture::capture_debugging_patterns(store, embed, &extracted, clock, today)?;
    report.debugging_patterns_captured = captured.len();

    tracing::info!(
        considered = report.messages_considered,
        classifications = report.classifications_captured,
        directives = report.directives_captured,
        debugging_patterns = report.debugging_patterns_captured,
        "transcript scan complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn scan_is_a_noop_on_an_empty_directory_with_no_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let embed = EmbeddingEngine::with_local_backend();
        let cfg = TranscriptConfig::default();
        let clock = Clock::system();
        let cursor_path = dir.path().join(".transcript-cursor");

        let result = scan(&store, &embed, dir.path(), &cursor_path, &cfg, &clock);
        assert!(result.is_err());
    }

    #[test]
    fn scan_captures_a_classifiable_message_and_persists_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"{{"type":"user","message":{{"content":"I am going to refactor this module into smaller pieces"}}}}"#
        )
        .unwrap();
        drop(f);

        let (store, _guard) = StorageEngine::open_temp().unwrap();
        let embed = EmbeddingEngine::with_local_backend();
        let cfg = TranscriptConfig::default();
        let clock = Clock::system();
        let cursor_path = dir.path().join(".transcript-cursor");

        let report = scan(&store, &embed, dir.path(), &cursor_path, &cfg, &clock).unwrap();
        assert_eq!(report.messages_considered, 1);
        assert!(reader::load_cursor(&cursor_path).is_some());
    }
}
