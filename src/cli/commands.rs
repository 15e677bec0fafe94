// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the three subcommands `train`, `evaluate` and
// `predict` with all their flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::ml::classifier::OptimizerKind;
use crate::ml::model::Architecture;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a sentiment model on a neg/ + pos/ review directory
    Train(TrainArgs),

    /// Loss and accuracy of a trained checkpoint on labelled reviews
    Evaluate(EvaluateArgs),

    /// Classify one or more texts with a trained checkpoint
    Predict(PredictArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ArchArg {
    /// Embeddings flattened straight into the dense layer
    Flatten,
    /// Stack of simple tanh recurrent layers
    SimpleRnn,
    /// Stack of LSTM layers
    Lstm,
}

impl From<ArchArg> for Architecture {
    fn from(a: ArchArg) -> Self {
        match a {
            ArchArg::Flatten   => Architecture::Flatten,
            ArchArg::SimpleRnn => Architecture::SimpleRnn,
            ArchArg::Lstm      => Architecture::Lstm,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OptimizerArg {
    Adam,
    #[value(name = "rmsprop")]
    RmsProp,
}

impl From<OptimizerArg> for OptimizerKind {
    fn from(o: OptimizerArg) -> Self {
        match o {
            OptimizerArg::Adam    => OptimizerKind::Adam,
            OptimizerArg::RmsProp => OptimizerKind::RmsProp,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing neg/ and pos/ folders of .txt reviews
    #[arg(long, default_value = "data/aclImdb/train")]
    pub data_dir: String,

    /// Where weights, config, tokenizer and metrics are written
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, value_enum, default_value_t = ArchArg::Lstm)]
    pub arch: ArchArg,

    /// Reviews are cut or padded to this many tokens
    #[arg(long, default_value_t = 100)]
    pub max_len: usize,

    /// Vocabulary cap; only the max_words - 1 most frequent words are kept
    #[arg(long, default_value_t = 10_000)]
    pub max_words: usize,

    /// Must match the GloVe file when --glove is given
    #[arg(long, default_value_t = 100)]
    pub embedding_dim: usize,

    /// Units per recurrent layer
    #[arg(long, default_value_t = 32)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 1)]
    pub recurrent_layers: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, value_enum, default_value_t = OptimizerArg::RmsProp)]
    pub optimizer: OptimizerArg,

    /// Fraction held out for validation (unless --training-samples is set)
    #[arg(long, default_value_t = 0.2)]
    pub validation_split: f64,

    /// Train on only this many shuffled reviews
    #[arg(long)]
    pub training_samples: Option<usize>,

    /// Validate on this many reviews following the training ones
    #[arg(long, requires = "training_samples")]
    pub validation_samples: Option<usize>,

    /// GloVe text file (e.g. glove.6B.100d.txt) to initialise embeddings
    #[arg(long)]
    pub glove: Option<String>,

    /// Keep the pre-trained embeddings fixed during training
    #[arg(long, requires = "glove")]
    pub freeze_embeddings: bool,

    /// Seeds weight init, the split and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:           a.data_dir,
            checkpoint_dir:     a.checkpoint_dir,
            architecture:       a.arch.into(),
            max_len:            a.max_len,
            max_words:          a.max_words,
            embedding_dim:      a.embedding_dim,
            hidden_size:        a.hidden_size,
            recurrent_layers:   a.recurrent_layers,
            epochs:             a.epochs,
            batch_size:         a.batch_size,
            lr:                 a.lr,
            optimizer:          a.optimizer.into(),
            validation_split:   a.validation_split,
            training_samples:   a.training_samples,
            validation_samples: a.validation_samples,
            glove_path:         a.glove,
            freeze_embeddings:  a.freeze_embeddings,
            seed:               a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Directory containing neg/ and pos/ folders of .txt reviews
    #[arg(long, default_value = "data/aclImdb/test")]
    pub data_dir: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Defaults to the batch size used for training
    #[arg(long)]
    pub batch_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Text to classify; repeat for several
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
