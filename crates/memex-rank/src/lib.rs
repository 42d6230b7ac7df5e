//! # memex-rank
//!
//! The `Ranker` component (§4.3): hybrid retrieval over the `Store`'s
//! lexical and vector indexes, fused via RRF and re-scored by temporal
//! decay, tier weight, and access confidence.

pub mod ranker;
pub mod rrf;
pub mod scoring;

pub use ranker::{auto_select_mode, Ranker, SearchFilters, SearchMode};
