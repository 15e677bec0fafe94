// ============================================================
// Layer 4: Word Tokenizer
// ============================================================
// Builds a frequency-ranked word vocabulary and turns texts
// into sequences of integer ids.
//
//   fit(max_words=4, ["the cat", "the dog"])
//     ranks:  the → 1, cat → 2, dog → 3
//     "the dog barked" → [1, 3]          ("barked" unseen → dropped)
//
// Index 0 is never assigned; the padder uses it as filler.
// Ties in frequency are ranked by first appearance in the
// corpus, so fitting twice on the same texts gives the same
// mapping.
//
// Every seen word is ranked, but only ids below `max_words`
// are ever emitted. Words ranked past the cap are dropped
// from sequences rather than mapped to an "unknown" id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Characters replaced by a space before splitting.
const FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Lowercase, blank out punctuation, split on whitespace.
pub fn split_words(text: &str) -> Vec<String> {
    let normalised: String = text
        .to_lowercase()
        .chars()
        .map(|c| if FILTERS.contains(c) { ' ' } else { c })
        .collect();

    normalised.split_whitespace().map(str::to_string).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenizerRecord", into = "TokenizerRecord")]
pub struct Tokenizer {
    max_words: usize,
    /// Words in rank order: `ranked[i]` has id `i + 1`
    ranked: Vec<String>,
    word_index: HashMap<String, u32>,
}

/// On-disk form: the index is rebuilt from the ranking on load.
#[derive(Serialize, Deserialize)]
struct TokenizerRecord {
    max_words: usize,
    ranked:    Vec<String>,
}

impl From<TokenizerRecord> for Tokenizer {
    fn from(r: TokenizerRecord) -> Self {
        Tokenizer::from_ranked(r.max_words, r.ranked)
    }
}

impl From<Tokenizer> for TokenizerRecord {
    fn from(t: Tokenizer) -> Self {
        TokenizerRecord { max_words: t.max_words, ranked: t.ranked }
    }
}

impl Tokenizer {
    /// Fit a fresh vocabulary on `texts`.
    pub fn fit<S: AsRef<str>>(max_words: usize, texts: &[S]) -> Self {
        // word → (count, first position seen)
        let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
        let mut next_seen = 0usize;

        for text in texts {
            for word in split_words(text.as_ref()) {
                let entry = freq.entry(word).or_insert_with(|| {
                    next_seen += 1;
                    (0, next_seen)
                });
                entry.0 += 1;
            }
        }

        let mut words: Vec<(String, (usize, usize))> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));

        let ranked = words.into_iter().map(|(w, _)| w).collect();
        let tokenizer = Self::from_ranked(max_words, ranked);

        tracing::info!(
            "Found {} unique tokens, keeping ids below {}",
            tokenizer.unique_tokens(),
            max_words
        );
        tokenizer
    }

    fn from_ranked(max_words: usize, ranked: Vec<String>) -> Self {
        let word_index = ranked
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i as u32 + 1))
            .collect();
        Self { max_words, ranked, word_index }
    }

    /// The configured cap: emitted ids are always `< max_words`
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Number of distinct words seen while fitting
    pub fn unique_tokens(&self) -> usize {
        self.ranked.len()
    }

    /// Rows an embedding table needs: ids actually emitted plus padding id 0
    pub fn vocab_size(&self) -> usize {
        self.max_words.min(self.ranked.len() + 1)
    }

    /// Rank of `word` among all fitted words (may exceed the cap)
    pub fn index_of(&self, word: &str) -> Option<u32> {
        self.word_index.get(word).copied()
    }

    /// Full word → id mapping, including words past the cap
    pub fn word_index(&self) -> &HashMap<String, u32> {
        &self.word_index
    }

    /// Words in rank order, id 1 first
    #[cfg(test)]
    pub fn ranked_words(&self) -> &[String] {
        &self.ranked
    }

    pub fn text_to_sequence(&self, text: &str) -> Vec<u32> {
        split_words(text)
            .iter()
            .filter_map(|w| self.index_of(w))
            .filter(|&id| (id as usize) < self.max_words)
            .collect()
    }

    pub fn texts_to_sequences<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|t| self.text_to_sequence(t.as_ref()))
            .collect()
    }
}
