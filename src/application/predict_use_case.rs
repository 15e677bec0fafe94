// ============================================================
// Layer 2: Predict Use Case
// ============================================================
// Classifies free text with a trained checkpoint.
// A probability above 0.5 means positive.

use anyhow::{ensure, Result};
use burn::prelude::*;

use crate::domain::review::Sentiment;
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone)]
pub struct Prediction {
    pub text:        String,
    pub probability: f32,
    pub sentiment:   Sentiment,
}

pub struct PredictUseCase<B: Backend> {
    inferencer: Inferencer<B>,
}

impl<B: Backend> PredictUseCase<B> {
    pub fn new(checkpoint_dir: &str, device: B::Device) -> Result<Self> {
        let inferencer = Inferencer::from_checkpoint(checkpoint_dir, device)?;
        Ok(Self { inferencer })
    }

    pub fn predict(&self, texts: &[String]) -> Result<Vec<Prediction>> {
        ensure!(!texts.is_empty(), "nothing to classify");
        let probs = self.inferencer.predict(texts)?;

        Ok(texts
            .iter()
            .zip(probs)
            .map(|(text, p)| {
                tracing::debug!("p(positive)={:.4} for '{}'", p, text);
                Prediction {
                    text:        text.clone(),
                    probability: p,
                    sentiment:   Sentiment::from_probability(p),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{tests::{small_config, write_corpus}, TrainUseCase};
    use burn::backend::{Autodiff, NdArray};

    #[test]
    fn test_predictions_from_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(&tmp.path().join("data"));
        let cfg = small_config(tmp.path());
        TrainUseCase::new(cfg.clone())
            .execute_on::<Autodiff<NdArray>>(Default::default())
            .unwrap();

        let use_case = PredictUseCase::<NdArray>::new(&cfg.checkpoint_dir, Default::default()).unwrap();
        let texts = vec!["great movie".to_string(), "terrible film".to_string()];
        let preds = use_case.predict(&texts).unwrap();

        assert_eq!(preds.len(), 2);
        for pred in &preds {
            assert!(pred.probability > 0.0 && pred.probability < 1.0);
            assert_eq!(pred.sentiment, Sentiment::from_probability(pred.probability));
        }
        assert!(use_case.predict(&[]).is_err());
    }
}
