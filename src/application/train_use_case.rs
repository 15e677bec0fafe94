// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load neg/ and pos/ reviews      (Layer 4 - data)
//   Step 2: Clean the text                  (Layer 4 - data)
//   Step 3: Fit the tokenizer               (Layer 4 - data)
//   Step 4: Texts → padded index matrix     (Layer 4 - data)
//   Step 5: Seeded train/validation split   (Layer 4 - data)
//   Step 6: Build the classifier, optionally
//           from GloVe vectors              (Layer 4 + 5)
//   Step 7: Save config and tokenizer       (Layer 6 - infra)
//   Step 8: Fit, checkpointing every epoch  (Layer 5 + 6)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{ensure, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};

use crate::data::{
    glove::{build_embedding_matrix, GloveTable},
    loader::ImdbLoader,
    padder::{pad_sequences, PadOptions},
    preprocessor::Preprocessor,
    splitter::{shuffled_indices, take_train_val},
    tokenizer::Tokenizer,
};
use crate::domain::history::{EpochMetrics, History};
use crate::domain::sequence::PaddedSequences;
use crate::domain::traits::{FitPlan, ReviewSource, SequenceClassifier, Validation};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::TokenizerStore,
};
use crate::ml::classifier::{OptimizerKind, SentimentClassifier, TrainingOptions};
use crate::ml::model::{Architecture, SentimentModel, SentimentModelConfig};
use crate::ml::trainer::EpochObserver;
use crate::ml::TrainBackend;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Saved next to the
// weights so evaluation and prediction can rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Directory holding neg/ and pos/ review files
    pub data_dir:           String,
    pub checkpoint_dir:     String,
    pub architecture:       Architecture,
    /// Every review is padded or cut to this many tokens
    pub max_len:            usize,
    /// Only the max_words - 1 most frequent words get an index
    pub max_words:          usize,
    pub embedding_dim:      usize,
    pub hidden_size:        usize,
    pub recurrent_layers:   usize,
    pub epochs:             usize,
    pub batch_size:         usize,
    pub lr:                 f64,
    pub optimizer:          OptimizerKind,
    /// Fraction of the shuffled data held out for validation
    /// (ignored when training_samples is set)
    pub validation_split:   f64,
    pub training_samples:   Option<usize>,
    /// Rows after the training rows; defaults to all of them
    pub validation_samples: Option<usize>,
    /// GloVe text file whose vectors seed the embedding table
    pub glove_path:         Option<String>,
    pub freeze_embeddings:  bool,
    pub seed:               u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:           "data/aclImdb/train".to_string(),
            checkpoint_dir:     "checkpoints".to_string(),
            architecture:       Architecture::Lstm,
            max_len:            100,
            max_words:          10_000,
            embedding_dim:      100,
            hidden_size:        32,
            recurrent_layers:   1,
            epochs:             10,
            batch_size:         32,
            lr:                 1e-3,
            optimizer:          OptimizerKind::RmsProp,
            validation_split:   0.2,
            training_samples:   None,
            validation_samples: None,
            glove_path:         None,
            freeze_embeddings:  false,
            seed:               42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_len > 0, "max_len must be positive");
        ensure!(self.max_words > 1, "max_words must be at least 2 (index 0 is padding)");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(self.epochs > 0, "epochs must be positive");
        ensure!(
            (0.0..1.0).contains(&self.validation_split),
            "validation_split must be in [0, 1), got {}",
            self.validation_split
        );
        ensure!(
            !self.freeze_embeddings || self.glove_path.is_some(),
            "--freeze-embeddings needs pre-trained vectors (--glove)"
        );
        Ok(())
    }

    /// Model shape for a tokenizer capped at `vocab_size` words.
    pub fn model_config(&self, vocab_size: usize) -> SentimentModelConfig {
        SentimentModelConfig::new(self.architecture, vocab_size, self.max_len, self.embedding_dim)
            .with_hidden_size(self.hidden_size)
            .with_recurrent_layers(self.recurrent_layers)
    }

    pub fn training_options(&self) -> TrainingOptions {
        TrainingOptions {
            optimizer:     self.optimizer,
            learning_rate: self.lr,
            seed:          self.seed,
        }
    }
}

// ─── Per-epoch persistence ────────────────────────────────────────────────────
/// Saves the weights and appends the metrics row after every epoch.
struct EpochRecorder {
    checkpoints: CheckpointManager,
    metrics:     MetricsLogger,
}

impl<B: AutodiffBackend> EpochObserver<B> for EpochRecorder {
    fn on_epoch_end(&mut self, model: &SentimentModel<B>, metrics: &EpochMetrics) -> Result<()> {
        self.checkpoints.save_model(model, metrics.epoch)?;
        self.metrics.log(metrics)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline on the default training backend.
    pub fn execute(&self) -> Result<History> {
        self.execute_on::<TrainBackend>(Default::default())
    }

    pub fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<History> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Load reviews ─────────────────────────────────────────────
        tracing::info!("Loading reviews from '{}'", cfg.data_dir);
        let reviews = ImdbLoader::new(&cfg.data_dir).load_all()?;
        ensure!(!reviews.is_empty(), "No reviews found under '{}'", cfg.data_dir);
        tracing::info!("Loaded {} reviews", reviews.len());

        // ── Step 2: Clean text ───────────────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let texts: Vec<String> = reviews.iter().map(|r| preprocessor.clean(&r.text)).collect();
        let labels: Vec<u8> = reviews.iter().map(|r| r.sentiment.label()).collect();

        // ── Step 3: Fit tokenizer ────────────────────────────────────────────
        let tokenizer = Tokenizer::fit(cfg.max_words, &texts);

        // ── Step 4: Index and pad ────────────────────────────────────────────
        let sequences = tokenizer.texts_to_sequences(&texts);
        let padded    = pad_sequences(&sequences, cfg.max_len, PadOptions::default());
        tracing::info!("Data tensor: {} x {}", padded.len(), padded.max_len());

        // ── Step 5: Split ────────────────────────────────────────────────────
        let (x_train, y_train, validation) = self.split(&padded, &labels);

        // ── Step 6: Build classifier ─────────────────────────────────────────
        let mut classifier = self.build_classifier::<B>(&tokenizer, device)?;

        // ── Step 7: Persist what inference needs ─────────────────────────────
        let checkpoints = CheckpointManager::new(&cfg.checkpoint_dir);
        checkpoints.save_config(cfg)?;
        TokenizerStore::new(&cfg.checkpoint_dir).save(&tokenizer)?;

        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        classifier.add_observer(Box::new(EpochRecorder { checkpoints, metrics }));

        // ── Step 8: Fit ──────────────────────────────────────────────────────
        let plan = FitPlan {
            epochs:     cfg.epochs,
            batch_size: cfg.batch_size,
            validation,
        };
        let history = classifier.fit(&x_train, &y_train, &plan)?;

        if let Some(best) = history.best_val_epoch() {
            tracing::info!(
                "Best validation loss {:.4} at epoch {}",
                best.val_loss.unwrap_or(f64::NAN),
                best.epoch
            );
        }
        Ok(history)
    }

    /// Shuffle once with the configured seed, then either take explicit
    /// train/validation counts or hold out a trailing fraction.
    fn split(&self, padded: &PaddedSequences, labels: &[u8]) -> (PaddedSequences, Vec<u8>, Validation) {
        let cfg = &self.config;
        let pick = |idx: &[usize]| -> (PaddedSequences, Vec<u8>) {
            (padded.select(idx), idx.iter().map(|&i| labels[i]).collect())
        };

        match cfg.training_samples {
            Some(train) => {
                let validation = cfg
                    .validation_samples
                    .unwrap_or_else(|| padded.len().saturating_sub(train));
                let all: Vec<usize> = (0..padded.len()).collect();
                let (train_idx, val_idx) = take_train_val(all, train, validation, cfg.seed);
                tracing::info!("Split: {} train, {} validation", train_idx.len(), val_idx.len());

                let (x_train, y_train) = pick(&train_idx);
                let validation = if val_idx.is_empty() {
                    Validation::None
                } else {
                    let (x_val, y_val) = pick(&val_idx);
                    Validation::Data(x_val, y_val)
                };
                (x_train, y_train, validation)
            }
            None => {
                let order = shuffled_indices(padded.len(), cfg.seed);
                let (x, y) = pick(&order);
                let validation = if cfg.validation_split > 0.0 {
                    Validation::Split(cfg.validation_split)
                } else {
                    Validation::None
                };
                (x, y, validation)
            }
        }
    }

    fn build_classifier<B: AutodiffBackend>(
        &self,
        tokenizer: &Tokenizer,
        device:    B::Device,
    ) -> Result<SentimentClassifier<B>> {
        let cfg       = &self.config;
        let model_cfg = cfg.model_config(tokenizer.max_words());
        let options   = cfg.training_options();

        match &cfg.glove_path {
            Some(path) => {
                tracing::info!("Loading GloVe vectors from '{}'", path);
                let table  = GloveTable::load(path, cfg.embedding_dim)?;
                let matrix = build_embedding_matrix(&table, tokenizer, cfg.max_words);
                tracing::info!(
                    "Embedding matrix {}x{}, {} rows matched a pre-trained vector (frozen: {})",
                    matrix.rows(),
                    matrix.dim(),
                    matrix.matched(),
                    cfg.freeze_embeddings
                );
                SentimentClassifier::with_embeddings(model_cfg, &matrix, cfg.freeze_embeddings, options, device)
            }
            None => SentimentClassifier::new(model_cfg, options, device),
        }
    }
}
