use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::sequence::PaddedSequences;

/// One padded review and its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSample {
    pub token_ids: Vec<u32>,
    pub label:     u8,
}

pub struct SentimentDataset {
    samples: Vec<SentimentSample>,
}

impl SentimentDataset {
    pub fn new(samples: Vec<SentimentSample>) -> Self { Self { samples } }

    /// Pair each padded row with its label; callers check the counts match.
    pub fn from_padded(sequences: &PaddedSequences, labels: &[u8]) -> Self {
        let samples = sequences
            .iter_rows()
            .zip(labels)
            .map(|(row, &label)| SentimentSample { token_ids: row.to_vec(), label })
            .collect();
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[SentimentSample] { &self.samples }
}

impl Dataset<SentimentSample> for SentimentDataset {
    fn get(&self, index: usize) -> Option<SentimentSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_padded_pairs_rows_with_labels() {
        let padded = PaddedSequences::from_rows(2, vec![vec![0, 1], vec![2, 3]]).unwrap();
        let ds = SentimentDataset::from_padded(&padded, &[1, 0]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples().iter().filter(|s| s.label == 1).count(), 1);
        let second = ds.get(1).unwrap();
        assert_eq!(second.token_ids, vec![2, 3]);
        assert_eq!(second.label, 0);
        assert!(ds.get(2).is_none());
    }
}
