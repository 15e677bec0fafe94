// ============================================================
// Layer 4: Sequence Padder
// ============================================================
// Brings variable-length id sequences to one fixed length so
// they can be stacked into a [batch, max_len] tensor.
//
// Defaults pad and truncate at the FRONT:
//
//   max_len = 4
//   [5, 6]             → [0, 0, 5, 6]
//   [1, 2, 3, 4, 5, 6] → [3, 4, 5, 6]     (keeps the last 4)
//
// Front-padding keeps the real tokens adjacent to the final
// timestep, which is the only output a recurrent classifier
// passes on.

use serde::{Deserialize, Serialize};

use crate::domain::sequence::PaddedSequences;

/// Which end of a sequence padding/truncation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Pre,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadOptions {
    pub padding:    Side,
    pub truncating: Side,
    /// Filler id; 0 is the reserved padding index
    pub value:      u32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self { padding: Side::Pre, truncating: Side::Pre, value: 0 }
    }
}

/// Pad or truncate one sequence to exactly `max_len` ids.
#[cfg(test)]
pub fn pad_sequence(seq: &[u32], max_len: usize, opts: PadOptions) -> Vec<u32> {
    let mut out = vec![opts.value; max_len];
    pad_into(seq, &mut out, opts);
    out
}

/// Pad every sequence into a `sequences.len() × max_len` matrix.
pub fn pad_sequences(sequences: &[Vec<u32>], max_len: usize, opts: PadOptions) -> PaddedSequences {
    PaddedSequences::from_row_fn(max_len, sequences.len(), |i, row| {
        pad_into(&sequences[i], row, opts)
    })
}

/// Write `seq` into `out`, padded or truncated to `out.len()`.
fn pad_into(seq: &[u32], out: &mut [u32], opts: PadOptions) {
    let max_len = out.len();
    let kept: &[u32] = if seq.len() > max_len {
        match opts.truncating {
            Side::Pre  => &seq[seq.len() - max_len..],
            Side::Post => &seq[..max_len],
        }
    } else {
        seq
    };

    let fill = max_len - kept.len();
    match opts.padding {
        Side::Pre => {
            out[..fill].fill(opts.value);
            out[fill..].copy_from_slice(kept);
        }
        Side::Post => {
            out[..kept.len()].copy_from_slice(kept);
            out[kept.len()..].fill(opts.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::Tokenizer;

    #[test]
    fn test_pre_padding_and_truncation() {
        let opts = PadOptions::default();
        assert_eq!(pad_sequence(&[5, 6], 4, opts), vec![0, 0, 5, 6]);
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5, 6], 4, opts), vec![3, 4, 5, 6]);
        assert_eq!(pad_sequence(&[], 3, opts), vec![0, 0, 0]);
        assert_eq!(pad_sequence(&[7, 8, 9], 3, opts), vec![7, 8, 9]);
    }

    #[test]
    fn test_post_options() {
        let opts = PadOptions { padding: Side::Post, truncating: Side::Post, value: 9 };
        assert_eq!(pad_sequence(&[5, 6], 4, opts), vec![5, 6, 9, 9]);
        assert_eq!(pad_sequence(&[1, 2, 3, 4, 5, 6], 4, opts), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_every_row_has_target_length() {
        let seqs: Vec<Vec<u32>> = (0..20).map(|n| (1..=n).collect()).collect();
        for max_len in [0, 1, 7, 19, 30] {
            let padded = pad_sequences(&seqs, max_len, PadOptions::default());
            assert_eq!(padded.len(), seqs.len());
            for (row, seq) in padded.iter_rows().zip(&seqs) {
                assert_eq!(row.len(), max_len);
                // Truncation keeps the tail, padding fills the front with zero
                let keep = seq.len().min(max_len);
                assert_eq!(&row[max_len - keep..], &seq[seq.len() - keep..]);
                assert!(row[..max_len - keep].iter().all(|&id| id == 0));
            }
        }
    }

    #[test]
    fn test_matrix_rows_match_single_sequence_padding() {
        let seqs: Vec<Vec<u32>> = vec![vec![], vec![4], vec![1, 2, 3, 4, 5]];
        let opts = PadOptions { padding: Side::Post, truncating: Side::Post, value: 7 };

        let padded = pad_sequences(&seqs, 3, opts);
        assert_eq!(padded.to_rows(), vec![vec![7, 7, 7], vec![4, 7, 7], vec![1, 2, 3]]);
        for (row, seq) in padded.iter_rows().zip(&seqs) {
            assert_eq!(row, pad_sequence(seq, 3, opts).as_slice());
        }

        assert!(pad_sequences(&[], 3, opts).is_empty());
    }

    #[test]
    fn test_two_review_pipeline() {
        let texts = ["great movie", "terrible film"];
        let tokenizer = Tokenizer::fit(10_000, &texts);

        assert_eq!(tokenizer.index_of("great"), Some(1));
        assert_eq!(tokenizer.index_of("movie"), Some(2));
        assert_eq!(tokenizer.index_of("terrible"), Some(3));
        assert_eq!(tokenizer.index_of("film"), Some(4));

        let padded = pad_sequences(
            &tokenizer.texts_to_sequences(&texts),
            5,
            PadOptions::default(),
        );
        assert_eq!(padded.to_rows(), vec![vec![0, 0, 0, 1, 2], vec![0, 0, 0, 3, 4]]);
    }
}
