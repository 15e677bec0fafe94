// ============================================================
// Layer 4: Train/Validation Splitter
// ============================================================
// The loader returns reviews grouped by class (all negatives,
// then all positives), so they must be shuffled before any
// split or the validation set would hold one class only.
//
// take_train_val(items, 200, 10_000, seed) keeps the first
// 200 shuffled rows for training and the next 10 000 for
// validation; the rest go unused. Useful for showing how
// embeddings behave on tiny training sets.
//
// Every shuffle takes an explicit seed so runs are repeatable.
//
// Reference: rand crate documentation (SliceRandom, StdRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Seeded Fisher-Yates shuffle of `0..n`.
pub fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    indices
}

/// Shuffle `samples`, then take the first `train` as training data
/// and the following `validation` as validation data.
///
/// Both counts are clamped to what is available.
pub fn take_train_val<T>(
    mut samples: Vec<T>,
    train:       usize,
    validation:  usize,
    seed:        u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let train_end = train.min(total);
    let wanted    = train_end.saturating_add(validation);
    let val_end   = wanted.min(total);

    if wanted > total {
        tracing::warn!(
            "Requested {} training + {} validation samples but only {} are available",
            train, validation, total
        );
    }

    samples.truncate(val_end);
    let val = samples.split_off(train_end);
    (samples, val)
}
