//! # memex-patterns
//!
//! The `Patterns` component (§4.5): the issue-save hook that clusters
//! recurring issues, and commit-indexing co-change recording. Thin
//! orchestration over `memex-storage`'s pattern/file-pair queries and
//! `memex-rank`'s `find_similar_issues`.

pub mod cochange;
pub mod issue_hook;

pub use cochange::record_commit;
pub use issue_hook::on_issue_saved;
