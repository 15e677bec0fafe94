// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All Burn model, training and inference code lives here.
// The data layer only touches Burn through its Dataset and
// Batcher traits.
//
//   rnn.rs        - plain tanh recurrent layer built from Linear
//   model.rs      - embedding → flatten | RNN stack | LSTM stack → dense
//   trainer.rs    - mini-batch loop, per-epoch metrics and observers
//   evaluator.rs  - loss/accuracy and probabilities on held-out data
//   classifier.rs - SentimentClassifier: model + optimiser settings
//   inferencer.rs - rebuilds a trained model from a checkpoint
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Hochreiter & Schmidhuber (1997) LSTM

/// Backend for inference and evaluation.
#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;
#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

/// Backend for training: the inference backend plus autodiff.
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

/// Simple (Elman) recurrent layer
pub mod rnn;

/// Sentiment model architectures
pub mod model;

/// Training loop
pub mod trainer;

/// Held-out loss, accuracy and probabilities
pub mod evaluator;

/// Stateful classifier used by the application layer
pub mod classifier;

/// Checkpoint-backed inference
pub mod inferencer;
