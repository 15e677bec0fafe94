// ============================================================
// Layer 5: Sentiment Classifier
// ============================================================
// Owns one SentimentModel and everything needed to train it.
// This is the object the application layer passes around:
//
//   let mut clf = SentimentClassifier::<TrainBackend>::new(cfg, opts, device)?;
//   let history = clf.fit(&x_train, &y_train, &plan)?;
//   let probs   = clf.predict(&x_test)?;
//   let eval    = clf.evaluate(&x_test, &y_test)?;
//
// Inputs are checked before any parameter update: ragged or
// mismatched data is a caller bug and stops the run.

use anyhow::{ensure, Result};
use burn::{
    module::{AutodiffModule, Module},
    optim::{AdamConfig, Optimizer, RmsPropConfig},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::SentimentDataset, glove::EmbeddingMatrix};
use crate::domain::history::{Evaluation, History};
use crate::domain::sequence::PaddedSequences;
use crate::domain::traits::{FitPlan, SequenceClassifier, Validation};
use crate::ml::evaluator;
use crate::ml::model::{SentimentModel, SentimentModelConfig};
use crate::ml::trainer::{self, EpochObserver, TrainerSettings};

/// Batch size for predict/evaluate, which have no FitPlan.
const INFERENCE_BATCH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizerKind {
    Adam,
    RmsProp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    pub optimizer:     OptimizerKind,
    pub learning_rate: f64,
    /// Drives weight initialisation and batch shuffling
    pub seed:          u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self { optimizer: OptimizerKind::RmsProp, learning_rate: 1e-3, seed: 42 }
    }
}

pub struct SentimentClassifier<B: AutodiffBackend> {
    model:     SentimentModel<B>,
    config:    SentimentModelConfig,
    options:   TrainingOptions,
    device:    B::Device,
    observers: Vec<Box<dyn EpochObserver<B>>>,
}

impl<B: AutodiffBackend> SentimentClassifier<B> {
    /// Fresh model with a trainable, randomly initialised embedding table.
    pub fn new(config: SentimentModelConfig, options: TrainingOptions, device: B::Device) -> Result<Self> {
        config.validate()?;
        B::seed(options.seed);
        let model = config.init::<B>(&device);
        Ok(Self::from_model(model, config, options, device))
    }

    /// Fresh model whose embedding table starts from pre-trained vectors.
    pub fn with_embeddings(
        config:  SentimentModelConfig,
        matrix:  &EmbeddingMatrix,
        freeze:  bool,
        options: TrainingOptions,
        device:  B::Device,
    ) -> Result<Self> {
        config.validate()?;
        B::seed(options.seed);
        let model = config.init_with_embeddings::<B>(matrix, freeze, &device)?;
        Ok(Self::from_model(model, config, options, device))
    }

    pub fn from_model(
        model:   SentimentModel<B>,
        config:  SentimentModelConfig,
        options: TrainingOptions,
        device:  B::Device,
    ) -> Self {
        tracing::info!(
            "Model ready: {} architecture, {} parameters",
            config.architecture,
            model.num_params()
        );
        Self { model, config, options, device, observers: Vec::new() }
    }

    /// Register a hook that runs after every training epoch.
    pub fn add_observer(&mut self, observer: Box<dyn EpochObserver<B>>) {
        self.observers.push(observer);
    }

    pub fn model(&self) -> &SentimentModel<B> {
        &self.model
    }

    pub fn config(&self) -> &SentimentModelConfig {
        &self.config
    }

    fn check_sequences(&self, batch: &PaddedSequences) -> Result<()> {
        ensure!(
            batch.max_len() == self.config.max_len,
            "sequences have length {} but the model was built for {}",
            batch.max_len(),
            self.config.max_len
        );
        if let Some(max_id) = batch.max_index() {
            ensure!(
                (max_id as usize) < self.config.vocab_size,
                "token id {} is outside the embedding table ({} rows)",
                max_id,
                self.config.vocab_size
            );
        }
        Ok(())
    }

    fn check_labelled(&self, batch: &PaddedSequences, labels: &[u8]) -> Result<()> {
        self.check_sequences(batch)?;
        ensure!(
            batch.len() == labels.len(),
            "{} sequences but {} labels",
            batch.len(),
            labels.len()
        );
        ensure!(
            labels.iter().all(|&l| l <= 1),
            "labels must be 0 or 1"
        );
        Ok(())
    }

    /// Resolve the plan's validation source into (train, validation) datasets.
    fn datasets(
        &self,
        batch:  &PaddedSequences,
        labels: &[u8],
        plan:   &FitPlan,
    ) -> Result<(SentimentDataset, Option<SentimentDataset>)> {
        match &plan.validation {
            Validation::None => Ok((SentimentDataset::from_padded(batch, labels), None)),
            Validation::Split(fraction) => {
                ensure!(
                    (0.0..1.0).contains(fraction),
                    "validation split must be in [0, 1), got {}",
                    fraction
                );
                // Trailing rows are held out, as given (no shuffle)
                let n_val = ((batch.len() as f64) * fraction).round() as usize;
                let cut = batch.len() - n_val.min(batch.len());
                let (x_train, x_val) = batch.split_at(cut);
                Ok((
                    SentimentDataset::from_padded(&x_train, &labels[..cut]),
                    Some(SentimentDataset::from_padded(&x_val, &labels[cut..])),
                ))
            }
            Validation::Data(x_val, y_val) => {
                self.check_labelled(x_val, y_val)?;
                Ok((
                    SentimentDataset::from_padded(batch, labels),
                    Some(SentimentDataset::from_padded(x_val, y_val)),
                ))
            }
        }
    }

    fn run<O>(
        &mut self,
        optim:    O,
        train:    SentimentDataset,
        valid:    Option<SentimentDataset>,
        settings: &TrainerSettings,
    ) -> Result<History>
    where
        O: Optimizer<SentimentModel<B>, B>,
    {
        let (model, history) = trainer::train(
            self.model.clone(),
            optim,
            train,
            valid,
            settings,
            &self.device,
            &mut self.observers,
        )?;
        self.model = model;
        Ok(history)
    }
}

impl<B: AutodiffBackend> SequenceClassifier for SentimentClassifier<B> {
    fn predict(&self, batch: &PaddedSequences) -> Result<Vec<f32>> {
        self.check_sequences(batch)?;
        evaluator::predict_proba(&self.model.valid(), batch, INFERENCE_BATCH, &self.device)
    }

    fn fit(&mut self, batch: &PaddedSequences, labels: &[u8], plan: &FitPlan) -> Result<History> {
        self.check_labelled(batch, labels)?;
        ensure!(plan.batch_size > 0, "batch size must be positive");
        ensure!(!batch.is_empty(), "no training data");

        let (train, valid) = self.datasets(batch, labels, plan)?;
        ensure!(train.sample_count() > 0, "validation split left no training data");

        let settings = TrainerSettings {
            epochs:        plan.epochs,
            batch_size:    plan.batch_size,
            learning_rate: self.options.learning_rate,
            seed:          self.options.seed,
        };

        match self.options.optimizer {
            OptimizerKind::Adam => {
                let optim = AdamConfig::new().with_epsilon(1e-8).init();
                self.run(optim, train, valid, &settings)
            }
            OptimizerKind::RmsProp => {
                let optim = RmsPropConfig::new().init();
                self.run(optim, train, valid, &settings)
            }
        }
    }

    fn evaluate(&self, batch: &PaddedSequences, labels: &[u8]) -> Result<Evaluation> {
        self.check_labelled(batch, labels)?;
        ensure!(!batch.is_empty(), "no evaluation data");
        let dataset = SentimentDataset::from_padded(batch, labels);
        Ok(evaluator::evaluate_dataset(&self.model.valid(), &dataset, INFERENCE_BATCH, &self.device))
    }
}
