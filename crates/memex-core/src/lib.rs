//! # memex-core
//!
//! Foundation crate for the memex memory engine.
//! Defines the entry/pattern/file-pair/cursor/replication types, the
//! error taxonomy, configuration, and the clock/id helpers.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod model;

pub use clock::Clock;
pub use config::MemexConfig;
pub use errors::{MemexError, MemexResult};
pub use model::{
    Entry, EntryType, FilePair, Pattern, ReplicationConfig, ReplicationState, Tier, TranscriptCursor,
};
