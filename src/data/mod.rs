// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from raw review files to tensor batches:
//
//   aclImdb/{train,test}/{neg,pos}/*.txt
//       │
//       ▼
//   ImdbLoader       → reads files, labels neg=0 / pos=1
//       │
//       ▼
//   Preprocessor     → strips <br /> markup, normalises whitespace
//       │
//       ▼
//   Tokenizer        → frequency-ranked ids, capped at max_words
//       │
//       ▼
//   pad_sequences    → fixed-length rows, padded at the front
//       │
//       ▼
//   splitter         → seeded shuffle, train/validation cut
//       │
//       ▼
//   SentimentDataset → implements Burn's Dataset trait
//       │
//       ▼
//   SentimentBatcher → stacks samples into tensor batches
//
// glove.rs sits to the side: it aligns pre-trained vectors
// with the tokenizer's ids for the embedding layer.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads IMDB review files from neg/ and pos/
pub mod loader;

/// Cleans raw review text
pub mod preprocessor;

/// Frequency-ranked word tokenizer
pub mod tokenizer;

/// Fixed-length padding and truncation
pub mod padder;

/// Pre-trained GloVe vectors and embedding matrix builder
pub mod glove;

/// Implements Burn's Dataset trait for labelled sequences
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffling and train/validation splits
pub mod splitter;
