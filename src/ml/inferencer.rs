// ============================================================
// Layer 5: Inferencer
// ============================================================
// Rebuilds the trained model from a checkpoint directory and
// scores raw review text with the exact preprocessing used
// at training time: clean → tokenize → pad.
use anyhow::Result;
use burn::prelude::*;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    dataset::SentimentDataset,
    padder::{pad_sequences, PadOptions},
    preprocessor::Preprocessor,
    tokenizer::Tokenizer,
};
use crate::domain::history::Evaluation;
use crate::domain::sequence::PaddedSequences;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::evaluator;
use crate::ml::model::SentimentModel;

pub struct Inferencer<B: Backend> {
    model:        SentimentModel<B>,
    tokenizer:    Tokenizer,
    preprocessor: Preprocessor,
    config:       TrainConfig,
    device:       B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(checkpoint_dir);
        let config    = ckpt_manager.load_config()?;
        let tokenizer = TokenizerStore::new(checkpoint_dir).load()?;

        let model_cfg = config.model_config(tokenizer.max_words());
        let model     = ckpt_manager.load_model(model_cfg.init::<B>(&device), &device)?;
        tracing::info!("Model loaded from checkpoint ({} architecture)", config.architecture);

        Ok(Self::new(model, tokenizer, config, device))
    }

    pub fn new(model: SentimentModel<B>, tokenizer: Tokenizer, config: TrainConfig, device: B::Device) -> Self {
        Self { model, tokenizer, preprocessor: Preprocessor::new(), config, device }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Raw texts → padded index matrix, as at training time.
    pub fn encode<S: AsRef<str>>(&self, texts: &[S]) -> PaddedSequences {
        let cleaned: Vec<String> = texts
            .iter()
            .map(|t| self.preprocessor.clean(t.as_ref()))
            .collect();
        let sequences = self.tokenizer.texts_to_sequences(&cleaned);
        pad_sequences(&sequences, self.config.max_len, PadOptions::default())
    }

    /// Positive-class probability per text.
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<f32>> {
        let padded = self.encode(texts);
        evaluator::predict_proba(&self.model, &padded, self.config.batch_size, &self.device)
    }

    pub fn evaluate<S: AsRef<str>>(&self, texts: &[S], labels: &[u8], batch_size: usize) -> Result<Evaluation> {
        anyhow::ensure!(texts.len() == labels.len(), "{} texts but {} labels", texts.len(), labels.len());
        let padded  = self.encode(texts);
        let dataset = SentimentDataset::from_padded(&padded, labels);
        Ok(evaluator::evaluate_dataset(&self.model, &dataset, batch_size, &self.device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::Architecture;
    use burn::backend::NdArray;

    type B = NdArray;

    fn inferencer() -> Inferencer<B> {
        let device = Default::default();
        let tokenizer = Tokenizer::fit(10, &["a great movie", "a terrible film"]);
        let config = TrainConfig { architecture: Architecture::Flatten, max_len: 4, embedding_dim: 3, ..TrainConfig::default() };
        let model = config.model_config(tokenizer.max_words()).init::<B>(&device);
        Inferencer::new(model, tokenizer, config, device)
    }

    #[test]
    fn test_encode_matches_training_preprocessing() {
        let inf = inferencer();
        let padded = inf.encode(&["A <br />GREAT movie!"]);
        assert_eq!(padded.max_len(), 4);
        // a=1, great/movie/terrible/film follow in first-seen order
        assert_eq!(padded.row(0), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_predict_and_evaluate() {
        let inf = inferencer();
        let probs = inf.predict(&["great movie", "terrible film", ""]).unwrap();
        assert_eq!(probs.len(), 3);
        assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));

        let eval = inf.evaluate(&["great movie", "terrible film"], &[1, 0], 2).unwrap();
        assert!(eval.loss.is_finite());
        assert!(inf.evaluate(&["great movie"], &[1, 0], 2).is_err());
    }
}
