//! The four frozen template catalogues (§6.3) that feed Embedder's
//! classifier: `directive`, `category`, `intent`, `anchor`. Each is a
//! `(category_label, template_text)` list; embeddings are computed lazily on
//! first use and cached for the process lifetime, following the corpus's
//! own lazy-initialization-behind-a-`OnceLock` convention elsewhere in the
//! codebase (e.g. `Clock::session_id`).

use std::sync::{Arc, OnceLock};

use crate::backend::EmbeddingBackend;
use crate::engine::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateSet {
    Directive,
    Category,
    Intent,
    Anchor,
}

const DIRECTIVE: &[(&str, &str)] = &[
    ("always", "always run the test suite before committing"),
    ("never", "never force push to the main branch"),
    ("stop", "stop adding unnecessary abstractions"),
    ("remember", "remember that this project uses tabs not spaces"),
    ("preference", "I prefer small focused commits over large ones"),
    ("correction", "that's not right, use the other approach instead"),
];

const CATEGORY: &[(&str, &str)] = &[
    ("decision", "we decided to use postgres instead of sqlite"),
    ("decision", "the team agreed to switch to the new API"),
    ("solution", "fixed the bug by closing the dangling connection"),
    ("solution", "resolved the race condition with a mutex"),
    ("discovery", "found that the cache was never being invalidated"),
    ("discovery", "discovered the config file was being ignored"),
];

const INTENT: &[(&str, &str)] = &[
    ("declaration", "I am going to refactor this module"),
    ("declaration", "let's build a new authentication flow"),
    ("declaration", "I will add tests for this function"),
    ("identity", "I'm the backend engineer on this project"),
    ("identity", "I work mostly on the frontend"),
    ("identity", "I'm new to this codebase"),
    ("preference", "I'd rather we used async here"),
    ("preference", "I like keeping functions short"),
    ("preference", "I prefer explicit error handling"),
    ("frustration", "this keeps breaking and it's frustrating"),
    ("frustration", "I've been stuck on this bug for hours"),
    ("frustration", "this is really annoying to debug"),
    ("ownership", "I own the deployment pipeline"),
    ("ownership", "this module is my responsibility"),
    ("ownership", "I maintain the CI configuration"),
    ("ownership", "that's my code, I wrote the original version"),
    ("ownership", "I'm responsible for the release process"),
];

const ANCHOR: &[(&str, &str)] = &[
    ("rule", "always validate input before processing it"),
    ("standard", "all public functions must have doc comments"),
    ("correction", "actually that's wrong, do it this way instead"),
    ("preference", "I'd rather we name it differently"),
    ("recommendation", "you should consider using a connection pool"),
    ("debugging", "the error happens when the input is empty"),
];

fn catalog(set: TemplateSet) -> &'static [(&'static str, &'static str)] {
    match set {
        TemplateSet::Directive => DIRECTIVE,
        TemplateSet::Category => CATEGORY,
        TemplateSet::Intent => INTENT,
        TemplateSet::Anchor => ANCHOR,
    }
}

type Computed = Vec<(&'static str, Vec<f32>)>;

pub struct TemplateCatalogues {
    directive: OnceLock<Computed>,
    category: OnceLock<Computed>,
    intent: OnceLock<Computed>,
    anchor: OnceLock<Computed>,
}

impl TemplateCatalogues {
    pub fn new() -> Self {
        Self {
            directive: OnceLock::new(),
            category: OnceLock::new(),
            intent: OnceLock::new(),
            anchor: OnceLock::new(),
        }
    }

    pub fn get(&self, set: TemplateSet, backend: &Arc<dyn EmbeddingBackend>) -> &Computed {
        let cell = match set {
            TemplateSet::Directive => &self.directive,
            TemplateSet::Category => &self.category,
            TemplateSet::Intent => &self.intent,
            TemplateSet::Anchor => &self.anchor,
        };
        cell.get_or_init(|| {
            catalog(set)
                .iter()
                .map(|(label, text)| (*label, normalize(&backend.embed_raw(text))))
                .collect()
        })
    }
}

impl Default for TemplateCatalogues {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalHashingBackend;

    #[test]
    fn every_catalogue_is_nonempty_and_matches_spec_counts() {
        assert_eq!(DIRECTIVE.len(), 6);
        assert_eq!(CATEGORY.len(), 6);
        assert_eq!(INTENT.len(), 17);
        assert_eq!(ANCHOR.len(), 6);
    }

    #[test]
    fn computed_templates_are_cached_across_calls() {
        let backend: Arc<dyn EmbeddingBackend> = Arc::new(LocalHashingBackend::new());
        let catalogues = TemplateCatalogues::new();
        let a = catalogues.get(TemplateSet::Directive, &backend) as *const _;
        let b = catalogues.get(TemplateSet::Directive, &backend) as *const _;
        assert_eq!(a, b);
    }
}
