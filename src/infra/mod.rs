// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Everything a training run leaves on disk, all inside one
// checkpoint directory:
//
//   checkpoint.rs      - model weights (gzipped MessagePack), the
//                        latest-epoch pointer and the TrainConfig
//                        JSON needed to rebuild the model
//
//   tokenizer_store.rs - the fitted vocabulary, so inference
//                        uses the training-time word indices
//
//   metrics.rs         - per-epoch history as CSV
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer saving and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
