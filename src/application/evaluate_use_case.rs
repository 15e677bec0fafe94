// ============================================================
// Layer 2: Evaluate Use Case
// ============================================================
// Scores a trained checkpoint on a labelled review directory
// (normally the held-out test split):
//
//   1. Rebuild model + tokenizer from the checkpoint
//   2. Load neg/ and pos/ reviews from the data directory
//   3. Clean → tokenize → pad exactly as at training time
//   4. Report loss and accuracy

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::data::loader::ImdbLoader;
use crate::domain::history::Evaluation;
use crate::domain::traits::ReviewSource;
use crate::ml::inferencer::Inferencer;
use crate::ml::InferBackend;

pub struct EvaluateUseCase {
    data_dir:       String,
    checkpoint_dir: String,
    /// Falls back to the training batch size
    batch_size:     Option<usize>,
}

impl EvaluateUseCase {
    pub fn new(data_dir: String, checkpoint_dir: String, batch_size: Option<usize>) -> Self {
        Self { data_dir, checkpoint_dir, batch_size }
    }

    pub fn execute(&self) -> Result<Evaluation> {
        self.execute_on::<InferBackend>(Default::default())
    }

    pub fn execute_on<B: Backend>(&self, device: B::Device) -> Result<Evaluation> {
        let inferencer = Inferencer::<B>::from_checkpoint(&self.checkpoint_dir, device)?;

        tracing::info!("Loading evaluation reviews from '{}'", self.data_dir);
        let reviews = ImdbLoader::new(&self.data_dir).load_all()?;
        ensure!(!reviews.is_empty(), "No reviews found under '{}'", self.data_dir);

        let texts: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
        let labels: Vec<u8> = reviews.iter().map(|r| r.sentiment.label()).collect();

        let batch_size = self.batch_size.unwrap_or(inferencer.config().batch_size);
        ensure!(batch_size > 0, "batch size must be positive");

        let eval = inferencer.evaluate(&texts, &labels, batch_size)?;
        tracing::info!(
            "Evaluated {} reviews: loss={:.4} accuracy={:.1}%",
            reviews.len(),
            eval.loss,
            eval.accuracy * 100.0
        );
        Ok(eval)
    }
}
