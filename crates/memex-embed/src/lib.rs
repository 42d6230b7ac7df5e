//! # memex-embed
//!
//! The `Embedder` component (§4.2): a cached text→unit-norm f32[384]
//! producer plus the four frozen template catalogues (§6.3) used to
//! classify free text for pattern and directive detection (§4.6).

pub mod backend;
pub mod engine;
pub mod templates;

pub use backend::{EmbeddingBackend, LocalHashingBackend};
pub use engine::{dot, normalize, Classification, EmbeddingEngine};
pub use templates::TemplateSet;
