use serde::{Deserialize, Serialize};

/// Loss and accuracy recorded after one training epoch.
///
/// Validation fields are `None` when the run had no held-out data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean binary cross-entropy over the epoch's training batches
    pub train_loss: f64,

    /// Fraction of training examples classified correctly
    pub train_acc: f64,

    pub val_loss: Option<f64>,
    pub val_acc:  Option<f64>,
}

/// Loss and accuracy on one labelled set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loss:     f64,
    pub accuracy: f64,
}

/// The learning curves of a training run, one entry per epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub epochs: Vec<EpochMetrics>,
}

impl History {
    pub fn push(&mut self, m: EpochMetrics) {
        self.epochs.push(m);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    #[cfg(test)]
    pub fn train_losses(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.train_loss).collect()
    }

    /// Epoch with the highest validation accuracy, if any epoch was validated
    pub fn best_val_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .filter(|m| m.val_acc.is_some())
            .max_by(|a, b| {
                a.val_acc
                    .partial_cmp(&b.val_acc)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch(n: usize, val_loss: Option<f64>, val_acc: Option<f64>) -> EpochMetrics {
        EpochMetrics { epoch: n, train_loss: 0.5, train_acc: 0.8, val_loss, val_acc }
    }

    #[test]
    fn test_best_val_epoch() {
        let mut h = History::default();
        h.push(epoch(1, Some(0.7), Some(0.55)));
        h.push(epoch(2, Some(0.6), Some(0.71)));
        h.push(epoch(3, Some(0.65), Some(0.68)));
        assert_eq!(h.best_val_epoch().map(|m| m.epoch), Some(2));
        assert_eq!(h.train_losses().len(), 3);
    }

    #[test]
    fn test_best_val_epoch_without_validation() {
        let mut h = History::default();
        h.push(epoch(1, None, None));
        assert!(h.best_val_epoch().is_none());
    }
}
