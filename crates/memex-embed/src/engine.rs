//! The `Embedder` component (§4.2): cached text→unit-norm f32[384], plus
//! template classification (§4.2, §6.3). Grounded on
//! `cortex-embeddings::engine::EmbeddingEngine` — an LRU cache in front of a
//! swappable backend, normalization applied centrally.

use std::sync::Arc;

use moka::sync::Cache;

use memex_core::constants::EMBED_CACHE_CAPACITY;

use crate::backend::{EmbeddingBackend, LocalHashingBackend};
use crate::templates::{self, TemplateSet};

pub struct EmbeddingEngine {
    backend: Arc<dyn EmbeddingBackend>,
    cache: Cache<String, Vec<f32>>,
    templates: templates::TemplateCatalogues,
}

/// Result of `classify` (§4.2): the best-matching category, iff its
/// similarity clears the caller's threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub similarity: f32,
}

impl EmbeddingEngine {
    pub fn new(backend: Arc<dyn EmbeddingBackend>) -> Self {
        let cache = Cache::builder().max_capacity(EMBED_CACHE_CAPACITY).build();
        Self {
            backend,
            cache,
            templates: templates::TemplateCatalogues::new(),
        }
    }

    pub fn with_local_backend() -> Self {
        Self::new(Arc::new(LocalHashingBackend::new()))
    }

    /// `embed(text) -> v[384]`, unit-norm, cached by `lower(trim(text))`
    /// (§4.2).
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let key = text.trim().to_lowercase();
        if let Some(v) = self.cache.get(&key) {
            return v;
        }
        let raw = self.backend.embed_raw(&key);
        let v = normalize(&raw);
        self.cache.insert(key, v.clone());
        v
    }

    /// `classify(text, templates, threshold)` (§4.2).
    pub fn classify(&self, text: &str, set: TemplateSet, threshold: f32) -> Option<Classification> {
        let v = self.embed(text);
        let templates = self.templates.get(set, &self.backend);
        let mut best: Option<(&str, f32)> = None;
        for (category, template_vec) in templates {
            let sim = dot(&v, template_vec);
            if best.map(|(_, b)| sim > b).unwrap_or(true) {
                best = Some((category, sim));
            }
        }
        best.filter(|(_, sim)| *sim >= threshold)
            .map(|(category, similarity)| Classification {
                category: category.to_string(),
                similarity,
            })
    }

    pub fn cache_len(&self) -> u64 {
        self.cache.entry_count()
    }
}

pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_is_unit_norm() {
        let engine = EmbeddingEngine::with_local_backend();
        let v = engine.embed("something went wrong in the build");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4 || norm == 0.0);
    }

    #[test]
    fn embed_is_case_and_whitespace_insensitive_for_cache_key() {
        let engine = EmbeddingEngine::with_local_backend();
        let a = engine.embed("  Hello World  ");
        let b = engine.embed("hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn classify_never_always_always() {
        let engine = EmbeddingEngine::with_local_backend();
        let result = engine.classify("always use tabs never spaces", TemplateSet::Directive, 0.0);
        assert!(result.is_some());
    }

    #[test]
    fn classify_returns_none_below_threshold() {
        let engine = EmbeddingEngine::with_local_backend();
        let result = engine.classify("completely unrelated filler text", TemplateSet::Directive, 0.999);
        assert!(result.is_none());
    }
}
