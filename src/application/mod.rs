// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Workflow coordination only: each use case wires the data,
// ml and infra layers together for one CLI command. No model
// math and no printing happen here.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Load → tokenize → pad → split → fit → checkpoint
pub mod train_use_case;

/// Loss and accuracy of a checkpoint on labelled reviews
pub mod evaluate_use_case;

/// Sentiment of free text
pub mod predict_use_case;
