// ============================================================
// Layer 5: Evaluator
// ============================================================
// Loss/accuracy and probabilities on data the model does not
// train on. Works on any backend; callers pass model.valid()
// (or a model loaded from a checkpoint) so no autodiff graph
// is built.

use anyhow::{anyhow, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    nn::loss::BinaryCrossEntropyLossConfig,
    prelude::*,
};

use crate::data::{
    batcher::SentimentBatcher,
    dataset::{SentimentDataset, SentimentSample},
};
use crate::domain::history::Evaluation;
use crate::domain::sequence::PaddedSequences;
use crate::ml::model::{correct_predictions, SentimentModel};

/// Mean BCE loss and accuracy over `dataset`, in fixed order.
///
/// An empty dataset yields a NaN loss and zero accuracy.
pub fn evaluate_dataset<B: Backend>(
    model:      &SentimentModel<B>,
    dataset:    &SentimentDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Evaluation {
    let batcher = SentimentBatcher::<B>::new(device.clone());
    let bce = BinaryCrossEntropyLossConfig::new()
        .with_logits(true)
        .init(device);

    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut seen     = 0usize;

    for chunk in dataset.samples().chunks(batch_size.max(1)) {
        let batch  = batcher.batch(chunk.to_vec());
        let logits = model.forward(batch.tokens);

        let loss: f64 = bce
            .forward(logits.clone(), batch.labels.clone())
            .into_scalar()
            .elem::<f64>();

        loss_sum += loss * chunk.len() as f64;
        correct  += correct_predictions(logits, batch.labels);
        seen     += chunk.len();
    }

    if seen == 0 {
        return Evaluation { loss: f64::NAN, accuracy: 0.0 };
    }

    Evaluation {
        loss:     loss_sum / seen as f64,
        accuracy: correct as f64 / seen as f64,
    }
}

/// Positive-class probability for every row of `sequences`.
pub fn predict_proba<B: Backend>(
    model:      &SentimentModel<B>,
    sequences:  &PaddedSequences,
    batch_size: usize,
    device:     &B::Device,
) -> Result<Vec<f32>> {
    let batcher = SentimentBatcher::<B>::new(device.clone());
    let mut out = Vec::with_capacity(sequences.len());

    let rows: Vec<&[u32]> = sequences.iter_rows().collect();
    for chunk in rows.chunks(batch_size.max(1)) {
        // Labels are unused here; the batcher just needs a value.
        let samples = chunk
            .iter()
            .map(|row| SentimentSample { token_ids: row.to_vec(), label: 0 })
            .collect();
        let batch = batcher.batch(samples);

        let probs: Vec<f32> = model
            .predict_proba(batch.tokens)
            .into_data()
            .convert::<f32>()
            .to_vec()
            .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;
        out.extend(probs);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::{Architecture, SentimentModelConfig};
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_predict_covers_every_row_across_batches() {
        let device = Default::default();
        let model = SentimentModelConfig::new(Architecture::Flatten, 8, 3, 2).init::<B>(&device);
        let rows: Vec<Vec<u32>> = (0..7).map(|i| vec![0, i % 8, (i + 1) % 8]).collect();
        let seqs = PaddedSequences::from_rows(3, rows).unwrap();

        let probs = predict_proba(&model, &seqs, 3, &device).unwrap();
        assert_eq!(probs.len(), 7);
        assert!(probs.iter().all(|&p| p > 0.0 && p < 1.0));

        // Batch size must not change the answers
        let one_by_one = predict_proba(&model, &seqs, 1, &device).unwrap();
        for (a, b) in probs.iter().zip(&one_by_one) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_evaluate_ranges_and_empty() {
        let device = Default::default();
        let model = SentimentModelConfig::new(Architecture::SimpleRnn, 8, 3, 2)
            .with_hidden_size(4)
            .init::<B>(&device);
        let seqs = PaddedSequences::from_rows(3, vec![vec![1, 2, 3], vec![0, 4, 5]]).unwrap();
        let ds = SentimentDataset::from_padded(&seqs, &[1, 0]);

        let eval = evaluate_dataset(&model, &ds, 4, &device);
        assert!(eval.loss.is_finite() && eval.loss > 0.0);
        assert!((0.0..=1.0).contains(&eval.accuracy));

        let empty = evaluate_dataset(&model, &SentimentDataset::new(Vec::new()), 4, &device);
        assert!(empty.loss.is_nan());
        assert_eq!(empty.accuracy, 0.0);
    }
}
