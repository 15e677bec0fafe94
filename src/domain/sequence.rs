// ============================================================
// Layer 3: Padded Sequences
// ============================================================
// A row-major (examples × max_len) matrix of vocabulary ids.
// This is what the padder produces and what every classifier
// consumes. Every row has exactly `max_len` entries; the
// constructors hand out fixed-size row slices, so downstream
// code never needs to re-check ragged input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddedSequences {
    max_len: usize,
    rows:    usize,
    data:    Vec<u32>,
}

impl PaddedSequences {
    /// Build `rows` rows by letting `fill` write each one in place.
    ///
    /// `fill` gets the row index and a zeroed slice of exactly
    /// `max_len` ids, so the result cannot be ragged.
    pub fn from_row_fn(max_len: usize, rows: usize, mut fill: impl FnMut(usize, &mut [u32])) -> Self {
        let mut data = vec![0; rows * max_len];
        if max_len > 0 {
            for (i, row) in data.chunks_exact_mut(max_len).enumerate() {
                fill(i, row);
            }
        }
        Self { max_len, rows, data }
    }

    /// Build from already fixed-length rows.
    ///
    /// Fails if any row length differs from `max_len`.
    #[cfg(test)]
    pub fn from_rows(max_len: usize, rows: Vec<Vec<u32>>) -> anyhow::Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            anyhow::ensure!(
                row.len() == max_len,
                "row {} has length {} but every row must have length {}",
                i,
                row.len(),
                max_len
            );
        }
        Ok(Self { max_len, rows: rows.len(), data: rows.concat() })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn row(&self, index: usize) -> &[u32] {
        let start = index * self.max_len;
        &self.data[start..start + self.max_len]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// All ids in row-major order
    pub fn as_flat(&self) -> &[u32] {
        &self.data
    }

    #[cfg(test)]
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Largest id anywhere in the matrix
    pub fn max_index(&self) -> Option<u32> {
        self.data.iter().copied().max()
    }

    /// Gather the given rows (in the given order) into a new matrix
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.max_len);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self { max_len: self.max_len, rows: indices.len(), data }
    }

    /// Split into rows `[0, at)` and `[at, len)`; `at` is clamped to `len`
    pub fn split_at(&self, at: usize) -> (Self, Self) {
        let at = at.min(self.rows);
        let cut = at * self.max_len;
        (
            Self { max_len: self.max_len, rows: at, data: self.data[..cut].to_vec() },
            Self { max_len: self.max_len, rows: self.rows - at, data: self.data[cut..].to_vec() },
        )
    }
}
