mod entry;
mod file_pair;
mod pattern;
mod replication;
mod transcript_cursor;

pub use entry::{Entry, EntryType, Tier};
pub use file_pair::FilePair;
pub use pattern::Pattern;
pub use replication::{ReplicationConfig, ReplicationState};
pub use transcript_cursor::TranscriptCursor;
