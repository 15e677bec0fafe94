// ============================================================
// Layer 3: Review Domain Type
// ============================================================
// One IMDB review: the raw text plus its binary sentiment.
// The loader produces these grouped by class (all negatives,
// then all positives); shuffling happens later with an
// explicit seed.

use serde::{Deserialize, Serialize};

/// Binary sentiment of a review.
///
/// The numeric label follows the directory convention of the
/// IMDB corpus: `neg` → 0, `pos` → 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Numeric label used as the training target
    pub fn label(self) -> u8 {
        match self {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }

    /// Name of the corpus subdirectory holding this class
    pub fn dir_name(self) -> &'static str {
        match self {
            Sentiment::Negative => "neg",
            Sentiment::Positive => "pos",
        }
    }

    /// Threshold a predicted probability at 0.5
    pub fn from_probability(p: f32) -> Self {
        if p > 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Negative => f.pad("negative"),
            Sentiment::Positive => f.pad("positive"),
        }
    }
}

/// A labelled review loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// File name the review came from, kept for traceability
    pub source: String,

    /// Raw review text before cleaning or tokenisation
    pub text: String,

    pub sentiment: Sentiment,
}

impl Review {
    pub fn new(source: impl Into<String>, text: impl Into<String>, sentiment: Sentiment) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            sentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_directory_convention() {
        assert_eq!(Sentiment::Negative.label(), 0);
        assert_eq!(Sentiment::Positive.label(), 1);
        assert_eq!(Sentiment::Negative.dir_name(), "neg");
        assert_eq!(Sentiment::Positive.dir_name(), "pos");
    }

    #[test]
    fn test_probability_threshold() {
        assert_eq!(Sentiment::from_probability(0.9), Sentiment::Positive);
        assert_eq!(Sentiment::from_probability(0.5), Sentiment::Negative);
        assert_eq!(Sentiment::from_probability(0.1), Sentiment::Negative);
    }
}
