//! Frequency aggregation over fetched texts
//!
//! Builds the word, word-count and complete-text mappings that the rarity
//! tables are computed from.

use ahash::RandomState;
use indexmap::IndexMap;

use crate::tokenizer::Tokenizer;
use crate::TokenId;

/// Key -> identifiers that produced it, iterated in first-seen key order.
/// Repeated pushes of the same identifier are kept.
pub type FrequencyMapping<K> = IndexMap<K, Vec<TokenId>, RandomState>;

/// Accumulates every per-identifier text in enumeration order
pub struct Aggregator {
    tokenizer: Tokenizer,

    pub word_to_ids: FrequencyMapping<String>,
    pub word_count_to_ids: FrequencyMapping<usize>,
    pub text_to_ids: FrequencyMapping<String>,

    /// Every token of every text, flattened
    pub all_words: Vec<String>,
    /// Token count per text, aligned with enumeration order
    pub all_word_counts: Vec<usize>,
    /// Normalized texts, aligned with enumeration order
    pub complete_texts: Vec<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            word_to_ids: FrequencyMapping::default(),
            word_count_to_ids: FrequencyMapping::default(),
            text_to_ids: FrequencyMapping::default(),
            all_words: Vec::new(),
            all_word_counts: Vec::new(),
            complete_texts: Vec::new(),
        }
    }

    /// Tokenize a normalized text and record it under `id`
    pub fn add_text(&mut self, id: TokenId, text: &str) {
        let tokens = self.tokenizer.tokenize(text);
        self.add_tokens(id, text, tokens);
    }

    /// Record an already tokenized text under `id`
    pub fn add_tokens(&mut self, id: TokenId, text: &str, tokens: Vec<String>) {
        let word_count = tokens.len();

        self.complete_texts.push(text.to_owned());
        self.text_to_ids.entry(text.to_owned()).or_default().push(id);

        for token in &tokens {
            self.word_to_ids.entry(token.clone()).or_default().push(id);
        }
        self.all_words.extend(tokens);

        self.all_word_counts.push(word_count);
        self.word_count_to_ids.entry(word_count).or_default().push(id);
    }

    /// Number of texts recorded so far
    pub fn num_texts(&self) -> usize {
        self.complete_texts.len()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
