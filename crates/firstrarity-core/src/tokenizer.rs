//! Word tokenizer for on-chain texts
//!
//! Keeps ASCII alphanumerics plus a small set of symbols; every other run of
//! characters becomes a single separator.

/// Symbols kept inside tokens besides ASCII alphanumerics.
pub const DEFAULT_KEPT_SYMBOLS: [char; 3] = ['%', '-', '.'];

/// Splits text into words on any character outside the kept set
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Non-alphanumeric characters that stay part of a word
    pub kept_symbols: Vec<char>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            kept_symbols: DEFAULT_KEPT_SYMBOLS.to_vec(),
        }
    }
}

impl Tokenizer {
    fn is_kept(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.kept_symbols.contains(&c)
    }

    /// Tokenize text into words, preserving order. Never yields empty tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !self.is_kept(c))
            .filter(|word| !word.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
