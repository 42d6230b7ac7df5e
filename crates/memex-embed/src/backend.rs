//! `EmbeddingBackend`: the swappable producer of raw (pre-normalization)
//! vectors. One implementation ships here — a deterministic, dependency-free
//! stand-in in the spirit of `cortex-embeddings`'s `TfIdfFallback`
//! (`cortex-embeddings::providers::tfidf_fallback`), which that crate
//! itself treats as the always-available last resort in its provider chain.
//! No ONNX/neural provider is implemented: embedding is one abstract
//! text→f32[384] mapping, with no requirement to load real model weights.

use memex_core::constants::EMBED_DIM;

/// Produces a raw embedding for a piece of text. Implementations need not
/// normalize their output — `EmbeddingEngine` normalizes to unit length.
pub trait EmbeddingBackend: Send + Sync {
    fn embed_raw(&self, text: &str) -> Vec<f32>;
    fn dims(&self) -> usize;
}

/// Hashes terms into fixed buckets and weights by term frequency, exactly
/// the shape of `TfIdfFallback::tfidf_vector`, generalized to a fixed
/// 384 dims.
pub struct LocalHashingBackend {
    dims: usize,
}

impl LocalHashingBackend {
    pub fn new() -> Self {
        Self { dims: EMBED_DIM }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x0000_0001_0000_01b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl Default for LocalHashingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingBackend for LocalHashingBackend {
    fn embed_raw(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut v = vec![0.0f32; self.dims];
        if tokens.is_empty() {
            return v;
        }
        let total = tokens.len() as f32;
        let mut tf = std::collections::HashMap::new();
        for t in &tokens {
            *tf.entry(t.as_str()).or_insert(0.0f32) += 1.0;
        }
        for (term, count) in tf {
            let freq = count / total;
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term, self.dims);
            v[bucket] += freq * idf;
        }
        v
    }

    fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_vector() {
        let b = LocalHashingBackend::new();
        let v = b.embed_raw("");
        assert_eq!(v.len(), EMBED_DIM);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn same_text_is_deterministic() {
        let b = LocalHashingBackend::new();
        assert_eq!(b.embed_raw("hello world"), b.embed_raw("hello world"));
    }
}
