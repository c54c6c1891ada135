//! Key-term extraction and reference comparison

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::nlp::stopwords::is_key_term_stopword;
use crate::nlp::{Document, HeuristicTagger, Tagger};

#[derive(Clone)]
pub struct DocumentAnalyzer {
    tagger: Arc<dyn Tagger>,
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicTagger))
    }
}

impl DocumentAnalyzer {
    pub fn new(tagger: Arc<dyn Tagger>) -> Self {
        Self { tagger }
    }

    pub fn tagger(&self) -> &dyn Tagger {
        self.tagger.as_ref()
    }

    /// Noun chunks free of stopwords plus standalone nouns longer than two
    /// characters, lowercased and deduplicated.
    pub fn extract_key_terms(&self, text: &str) -> BTreeSet<String> {
        let doc = Document::parse(text, self.tagger());
        let mut terms = BTreeSet::new();

        for chunk in doc.noun_chunks() {
            if !chunk.tokens.iter().any(|t| is_key_term_stopword(&t.text)) {
                terms.insert(chunk.text.to_lowercase());
            }
        }

        for token in doc.tokens() {
            if token.pos.is_nominal()
                && !is_key_term_stopword(&token.text)
                && token.text.chars().count() > 2
            {
                terms.insert(token.text.to_lowercase());
            }
        }

        log::debug!("Extracted {} key terms from {} chars", terms.len(), text.len());
        terms
    }

    /// Document terms that also appear in the reference set, exact match only.
    pub fn compare_with_reference(
        &self,
        text: &str,
        reference_terms: &BTreeSet<String>,
    ) -> Vec<String> {
        self.extract_key_terms(text)
            .intersection(reference_terms)
            .cloned()
            .collect()
    }
}
