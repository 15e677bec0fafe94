// ============================================================
// Layer 5: Training Loop
// ============================================================
// Mini-batch training with binary cross-entropy:
//
//   for epoch in 1..=epochs
//     for batch in shuffled train batches
//       logits = model(tokens)
//       loss   = BCE(logits, labels)
//       grads  = loss.backward()
//       model  = optimiser.step(lr, model, grads)
//     evaluate on the validation set (if any)
//     record EpochMetrics, notify observers
//
// There is no early stopping: exactly `epochs` epochs run.
// Parameters excluded from autodiff (a frozen embedding
// table) produce no gradients and are left untouched by the
// optimiser step.
//
// Validation runs on the inner (non-autodiff) backend via
// model.valid(), so no graph is recorded for it.
//
// Reference: Burn Book §5 (Custom Training Loop)
//            Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::{batcher::SentimentBatcher, dataset::SentimentDataset};
use crate::domain::history::{EpochMetrics, History};
use crate::ml::evaluator::evaluate_dataset;
use crate::ml::model::{correct_predictions, SentimentModel};

/// Settings for one call to [`train`].
#[derive(Debug, Clone)]
pub struct TrainerSettings {
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    /// Seeds the batch shuffling
    pub seed:          u64,
}

/// Hook called after every epoch, e.g. to checkpoint the model
/// or append the metrics to a CSV file.
pub trait EpochObserver<B: AutodiffBackend> {
    fn on_epoch_end(&mut self, model: &SentimentModel<B>, metrics: &EpochMetrics) -> Result<()>;
}

pub fn train<B, O>(
    mut model:     SentimentModel<B>,
    mut optim:     O,
    train_dataset: SentimentDataset,
    val_dataset:   Option<SentimentDataset>,
    settings:      &TrainerSettings,
    device:        &B::Device,
    observers:     &mut [Box<dyn EpochObserver<B>>],
) -> Result<(SentimentModel<B>, History)>
where
    B: AutodiffBackend,
    O: Optimizer<SentimentModel<B>, B>,
{
    tracing::info!(
        "Training on {} samples ({} validation), {} epochs, batch size {}",
        train_dataset.sample_count(),
        val_dataset.as_ref().map_or(0, |d| d.sample_count()),
        settings.epochs,
        settings.batch_size,
    );

    let train_loader = DataLoaderBuilder::new(SentimentBatcher::<B>::new(device.clone()))
        .batch_size(settings.batch_size)
        .shuffle(settings.seed)
        .build(train_dataset);

    let mut history = History::default();

    for epoch in 1..=settings.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut loss_sum = 0.0f64;
        let mut correct  = 0usize;
        let mut seen     = 0usize;

        for batch in train_loader.iter() {
            let batch_len = batch.labels.dims()[0];
            let (loss, logits) = model.forward_loss(batch.tokens, batch.labels.clone());

            loss_sum += loss.clone().into_scalar().elem::<f64>() * batch_len as f64;
            correct  += correct_predictions(logits.detach(), batch.labels);
            seen     += batch_len;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(settings.learning_rate, model, grads);
        }

        let (train_loss, train_acc) = if seen > 0 {
            (loss_sum / seen as f64, correct as f64 / seen as f64)
        } else {
            (f64::NAN, 0.0)
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let validation = val_dataset
            .as_ref()
            .filter(|d| d.sample_count() > 0)
            .map(|d| evaluate_dataset(&model.valid(), d, settings.batch_size, device));

        let metrics = EpochMetrics {
            epoch,
            train_loss,
            train_acc,
            val_loss: validation.map(|v| v.loss),
            val_acc:  validation.map(|v| v.accuracy),
        };

        match (metrics.val_loss, metrics.val_acc) {
            (Some(vl), Some(va)) => tracing::info!(
                "Epoch {:>3}/{} | loss={:.4} | acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
                epoch, settings.epochs, train_loss, train_acc * 100.0, vl, va * 100.0,
            ),
            _ => tracing::info!(
                "Epoch {:>3}/{} | loss={:.4} | acc={:.1}%",
                epoch, settings.epochs, train_loss, train_acc * 100.0,
            ),
        }

        for observer in observers.iter_mut() {
            observer.on_epoch_end(&model, &metrics)?;
        }
        history.push(metrics);
    }

    tracing::info!("Training complete!");
    Ok((model, history))
}
