// ============================================================
// Layer 4: Sentiment Batcher
// ============================================================
// Implements Burn's Batcher trait to stack SentimentSamples
// into tensors:
//
//   Input:  Vec of N samples, each with L token ids
//   Output: SentimentBatch { tokens: [N, L] Int, labels: [N, 1] Int }
//
// Samples arrive already padded to the same length, so the
// ids are flattened row-major and reshaped in one go.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SentimentSample;

#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Token ids - shape: [batch_size, max_len]
    pub tokens: Tensor<B, 2, Int>,

    /// 0/1 targets - shape: [batch_size, 1]
    /// Kept 2D so it lines up with the model's [batch_size, 1] logits
    pub labels: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct SentimentBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SentimentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentimentSample, SentimentBatch<B>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<SentimentSample>) -> SentimentBatch<B> {
        let batch_size = items.len();
        let max_len    = items.first().map_or(0, |s| s.token_ids.len());

        let token_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.token_ids.iter().map(|&id| id as i32))
            .collect();

        let label_flat: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let tokens = Tensor::<B, 2, Int>::from_data(
            TensorData::new(token_flat, [batch_size, max_len]),
            &self.device,
        );
        let labels = Tensor::<B, 2, Int>::from_data(
            TensorData::new(label_flat, [batch_size, 1]),
            &self.device,
        );

        SentimentBatch { tokens, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let batcher = SentimentBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            SentimentSample { token_ids: vec![0, 0, 7], label: 1 },
            SentimentSample { token_ids: vec![4, 5, 6], label: 0 },
        ]);

        assert_eq!(batch.tokens.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2, 1]);

        let tokens: Vec<i64> = batch.tokens.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(tokens, vec![0, 0, 7, 4, 5, 6]);
        let labels: Vec<i64> = batch.labels.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(labels, vec![1, 0]);
    }
}
