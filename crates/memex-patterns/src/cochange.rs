//! Co-change recording (§4.5): on indexing a commit with 2..20 changed
//! files, upserts every unordered pair.

use chrono::NaiveDate;

use memex_core::errors::MemexResult;
use memex_storage::StorageEngine;

const MIN_FILES: usize = 2;
const MAX_FILES: usize = 20;

/// `record_commit(project, files, date)` (§4.5). Does nothing for commits
/// outside `[2, 20)` changed files — too small to imply co-change, too
/// large to be a meaningful signal (mass renames, vendored updates).
pub fn record_commit(store: &StorageEngine, project: &str, files: &[String], date: NaiveDate) -> MemexResult<()> {
    if files.len() < MIN_FILES || files.len() >= MAX_FILES {
        return Ok(());
    }
    for i in 0..files.len() {
        for j in (i + 1)..files.len() {
            store.upsert_file_pair(project, &files[i], &files[j], date)?;
        }
    }
    Ok(())
}
