// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust types and traits describing the sentiment task:
// a labelled review, a padded batch of token ids, the training
// history, and the capabilities other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled movie review
pub mod review;

// Fixed-length token id matrix fed to the classifiers
pub mod sequence;

// Per-epoch loss/accuracy records
pub mod history;

// Core abstractions (traits) that other layers implement
pub mod traits;
