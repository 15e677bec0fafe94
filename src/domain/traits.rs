// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits rather than to
// concrete loaders or Burn models:
//   - ImdbLoader implements ReviewSource
//   - SentimentClassifier<B> implements SequenceClassifier for
//     all three architectures (flatten, simple RNN, LSTM)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::history::{Evaluation, History};
use crate::domain::review::Review;
use crate::domain::sequence::PaddedSequences;

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can load labelled reviews.
pub trait ReviewSource {
    /// Load every review, grouped by class (negatives first).
    fn load_all(&self) -> Result<Vec<Review>>;
}

// ─── Validation ───────────────────────────────────────────────────────────────
/// Where held-out data for per-epoch validation comes from.
#[derive(Debug, Clone)]
pub enum Validation {
    /// No per-epoch validation
    None,
    /// Hold out the trailing fraction of the training rows (not shuffled)
    Split(f64),
    /// Explicit validation rows and labels
    Data(PaddedSequences, Vec<u8>),
}

/// Epoch/batch settings for one call to `fit`.
#[derive(Debug, Clone)]
pub struct FitPlan {
    pub epochs:     usize,
    pub batch_size: usize,
    pub validation: Validation,
}

// ─── SequenceClassifier ───────────────────────────────────────────────────────
/// A binary classifier over padded token id sequences.
///
/// Implementations own their parameters: `fit` mutates them,
/// `predict` and `evaluate` only read them.
pub trait SequenceClassifier {
    /// Positive-class probability for each row, each in (0, 1)
    fn predict(&self, batch: &PaddedSequences) -> Result<Vec<f32>>;

    /// Train for `plan.epochs` epochs and return the learning curves.
    /// Inputs are validated before any parameter update.
    fn fit(&mut self, batch: &PaddedSequences, labels: &[u8], plan: &FitPlan) -> Result<History>;

    fn evaluate(&self, batch: &PaddedSequences, labels: &[u8]) -> Result<Evaluation>;
}
