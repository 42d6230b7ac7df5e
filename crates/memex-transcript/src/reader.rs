//! Incremental JSONL tailing (§4.6 "Incremental read"). No direct
//! equivalent exists for this component elsewhere in the codebase; it
//! follows the same read-chunk/persist-cursor shape
//! `cortex-storage::recovery::wal_recovery` uses for its own incremental
//! WAL replay, adapted
//! to a cursor persisted as a small JSON blob rather than a database row.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memex_core::errors::{MemexResult, TranscriptError};
use memex_core::TranscriptCursor;

/// Find the most recently modified `.jsonl` file directly under `dir`.
pub fn most_recent_jsonl(dir: &Path) -> MemexResult<PathBuf> {
    let mut newest: Option<(PathBuf, std::time::SystemTime)> = None;
    let entries = std::fs::read_dir(dir).map_err(TranscriptError::from)?;
    for entry in entries {
        let entry = entry.map_err(TranscriptError::from)?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let modified = entry.metadata().map_err(TranscriptError::from)?.modified().map_err(TranscriptError::from)?;
        if newest.as_ref().map(|(_, t)| modified > *t).unwrap_or(true) {
            newest = Some((path, modified));
        }
    }
    newest
        .map(|(p, _)| p)
        .ok_or_else(|| TranscriptError::NoTranscriptFiles(dir.display().to_string()).into())
}

pub fn load_cursor(path: &Path) -> Option<TranscriptCursor> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

pub fn save_cursor(path: &Path, cursor: &TranscriptCursor) -> MemexResult<()> {
    let text = serde_json::to_string(cursor).map_err(|e| TranscriptError::CursorCorrupt(e.to_string()))?;
    std::fs::write(path, text).map_err(TranscriptError::from)?;
    Ok(())
}

/// One chunk read from the active transcript file: complete lines plus the
/// cursor position to persist afterward.
pub struct ChunkRead {
    pub lines: Vec<String>,
    pub new_offset: u64,
}

/// Read up to `max_chunk_bytes` starting at `cursor.offset`, split on `\n`,
/// and process complete lines only. A trailing partial line leaves the
/// offset just past the last complete line; if the read reaches EOF, the
/// offset advances by the full number of bytes read (§4.6).
pub fn read_chunk(file_path: &Path, offset: u64, max_chunk_bytes: usize) -> MemexResult<ChunkRead> {
    let mut file = File::open(file_path).map_err(TranscriptError::from)?;
    let file_len = file.metadata().map_err(TranscriptError::from)?.len();
    file.seek(SeekFrom::Start(offset)).map_err(TranscriptError::from)?;

    let mut buf = vec![0u8; max_chunk_bytes];
    let mut total_read = 0usize;
    loop {
        let n = file.read(&mut buf[total_read..]).map_err(TranscriptError::from)?;
        if n == 0 {
            break;
        }
        total_read += n;
        if total_read == buf.len() {
            break;
        }
    }
    buf.truncate(total_read);

    let reached_eof = offset + total_read as u64 >= file_len;
    let text = String::from_utf8_lossy(&buf);

    let new_offset = if reached_eof {
        offset + total_read as u64
    } else {
        match text.rfind('\n') {
            Some(pos) => offset + pos as u64 + 1,
            None => offset,
        }
    };

    let consumed_len = (new_offset - offset) as usize;
    let consumed = &buf[..consumed_len.min(buf.len())];
    let lines: Vec<String> = String::from_utf8_lossy(consumed)
        .split('\n')
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect();

    Ok(ChunkRead { lines, new_offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_complete_lines_only_when_trailing_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        let mut f = File::create(&path).unwrap();
        write!(f, "{{\"a\":1}}\n{{\"b\":2}}\n{{\"c\":").unwrap();
        drop(f);

        let chunk = read_chunk(&path, 0, 1024 * 1024).unwrap();
        assert_eq!(chunk.lines.len(), 2);
        assert!(chunk.new_offset < std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn reads_to_eof_when_file_ends_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        std::fs::write(&path, "{\"a\":1}\n{\"b\":2}\n").unwrap();

        let chunk = read_chunk(&path, 0, 1024 * 1024).unwrap();
        assert_eq!(chunk.lines.len(), 2);
        assert_eq!(chunk.new_offset, std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn cursor_roundtrips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".transcript-cursor");
        let cursor = TranscriptCursor::new("foo.jsonl".into(), 42);
        save_cursor(&path, &cursor).unwrap();
        assert_eq!(load_cursor(&path), Some(cursor));
    }
}
