//! # memex-sync
//!
//! The Replicator component (§4.7/§6.4): append-only per-host JSONL blobs
//! on an object store, a manifest, per-host remote cursors, and a
//! push/pull/cycle protocol with no auth, quota, or CRDT conflict
//! resolution (spec.md §1 Non-goals exclude cross-host ordering finer than
//! per-host append order).

pub mod blob_store;
pub mod cycle;
pub mod manifest;
pub mod pull;
pub mod push;
pub mod record;
pub mod scheduler;
pub mod state;

pub use blob_store::{Blob, BlobStore, HttpBlobStore};
pub use cycle::{run_cycle, CycleReport};
pub use manifest::Manifest;
pub use pull::{pull, PullReport};
pub use push::{push, PushReport};
pub use record::SyncRecord;
