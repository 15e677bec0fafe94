// ============================================================
// Layer 4: Pre-trained Embedding Table (GloVe)
// ============================================================
// Reads a GloVe text file and lines its vectors up with the
// tokenizer's ids so they can seed the model's embedding layer.
//
// File format, one word per line:
//   the 0.418 0.24968 -0.41242 ... (dim floats)
//
// Lines with the wrong number of components or unparsable
// numbers are skipped with a warning. A missing file, or one
// with no vector of the requested size, is an error.
//
// Reference: Pennington et al. (2014) GloVe

use anyhow::{ensure, Context, Result};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::data::tokenizer::Tokenizer;

/// Malformed lines reported one by one; the rest only count.
const MAX_LINE_WARNINGS: usize = 5;

/// word → vector lookup, every vector of length `dim`.
#[derive(Debug, Clone, Default)]
pub struct GloveTable {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl GloveTable {
    pub fn load(path: impl AsRef<Path>, dim: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open embedding file '{}'", path.display()))?;
        let table = Self::parse(BufReader::new(file), dim)
            .with_context(|| format!("Cannot read embedding file '{}'", path.display()))?;
        tracing::info!("Loaded {} word vectors (dim={}) from '{}'", table.len(), dim, path.display());
        Ok(table)
    }

    /// Parse `word v1 ... v{dim}` lines.
    ///
    /// Fails when no line has exactly `dim` components, which is
    /// what a GloVe file of another dimension looks like.
    pub fn parse<R: BufRead>(reader: R, dim: usize) -> Result<Self> {
        let mut vectors = HashMap::new();
        let mut skipped = 0usize;
        let mut seen_dim: Option<usize> = None;

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };

            let values: Result<Vec<f32>, _> = parts.map(str::parse::<f32>).collect();
            let reason = match values {
                Ok(v) if v.len() == dim => {
                    vectors.insert(word.to_string(), v);
                    continue;
                }
                Ok(v) => {
                    seen_dim.get_or_insert(v.len());
                    format!("has {} components, expected {}", v.len(), dim)
                }
                Err(e) => format!("has a bad number ({e})"),
            };

            skipped += 1;
            if skipped <= MAX_LINE_WARNINGS {
                tracing::warn!("Skipping line {}: '{}' {}", n + 1, word, reason);
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} malformed embedding lines", skipped);
        }
        ensure!(
            !vectors.is_empty(),
            "no {}-dimensional vectors found{}",
            dim,
            seen_dim
                .map(|d| format!(" (lines have {d} components; check --embedding-dim)"))
                .unwrap_or_default()
        );
        Ok(Self { dim, vectors })
    }

    /// Build a table from in-memory vectors; all must have length `dim`
    #[cfg(test)]
    pub fn from_entries<I>(dim: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut vectors = HashMap::new();
        for (word, v) in entries {
            ensure!(v.len() == dim, "vector for '{}' has length {}, expected {}", word, v.len(), dim);
            vectors.insert(word, v);
        }
        Ok(Self { dim, vectors })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

/// Row-major `rows × dim` weights for an embedding layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    rows:    usize,
    dim:     usize,
    data:    Vec<f32>,
    /// Rows filled from the table
    matched: usize,
}

impl EmbeddingMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dim..(index + 1) * self.dim]
    }

    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

}

/// Align `table` to the tokenizer's ids.
///
/// Row `i` holds the vector of the word whose id is `i`; the row
/// stays zero when that word has no vector or `i >= max_words`.
/// Row 0 (padding) is always zero.
pub fn build_embedding_matrix(table: &GloveTable, tokenizer: &Tokenizer, max_words: usize) -> EmbeddingMatrix {
    let dim = table.dim();
    let mut data = vec![0.0f32; max_words * dim];
    let mut matched = 0usize;

    for (word, &id) in tokenizer.word_index() {
        let id = id as usize;
        if id >= max_words {
            continue;
        }
        if let Some(v) = table.get(word) {
            data[id * dim..(id + 1) * dim].copy_from_slice(v);
            matched += 1;
        }
    }

    tracing::info!(
        "Embedding matrix {}x{}: {} of {} rows found in the pre-trained table",
        max_words, dim, matched, max_words.saturating_sub(1)
    );

    EmbeddingMatrix { rows: max_words, dim, data, matched }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = "good 0.1 0.2 0.3\nbad 0.5 0.6\n\nugly 1 x 3\nfine -1 0 1e-2\n";
        let table = GloveTable::parse(Cursor::new(text), 3).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("good"), Some(&[0.1, 0.2, 0.3][..]));
        assert_eq!(table.get("fine"), Some(&[-1.0, 0.0, 0.01][..]));
        assert!(table.get("bad").is_none());
        assert!(table.get("ugly").is_none());
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let text = "good 0.1 0.2 0.3\nbad 0.5 0.6 0.7\n";
        let err = GloveTable::parse(Cursor::new(text), 2).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("2-dimensional"), "{msg}");
        assert!(msg.contains("3 components"), "{msg}");

        assert!(GloveTable::parse(Cursor::new(""), 2).is_err());
    }

    #[test]
    fn test_load_rejects_wrong_dimension_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("glove.3d.txt");
        std::fs::write(&path, "the 0.1 0.2 0.3\nmovie 0.4 0.5 0.6\n").unwrap();

        assert!(GloveTable::load(&path, 2).is_err());
        assert_eq!(GloveTable::load(&path, 3).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(GloveTable::load("/definitely/not/here.txt", 50).is_err());
    }

    #[test]
    fn test_matrix_alignment_and_zero_rows() {
        // great → 1, movie → 2, awful → 3
        let tokenizer = Tokenizer::fit(100, &["great great great movie movie awful"]);
        let table = GloveTable::from_entries(
            2,
            vec![
                ("great".to_string(), vec![1.0, 2.0]),
                ("awful".to_string(), vec![-1.0, -2.0]),
                ("unrelated".to_string(), vec![9.0, 9.0]),
            ],
        )
        .unwrap();

        let m = build_embedding_matrix(&table, &tokenizer, 6);
        assert_eq!(m.rows(), 6);
        assert_eq!(m.dim(), 2);
        assert_eq!(m.row(0), &[0.0, 0.0]);
        assert_eq!(m.row(1), &[1.0, 2.0]);
        assert_eq!(m.row(2), &[0.0, 0.0]); // "movie" has no vector
        assert_eq!(m.row(3), &[-1.0, -2.0]);
        assert_eq!(m.row(5), &[0.0, 0.0]);
        assert_eq!(m.matched(), 2);
    }

    #[test]
    fn test_ids_past_the_cap_stay_zero() {
        let tokenizer = Tokenizer::fit(100, &["a a a b b c"]);
        let table = GloveTable::from_entries(
            1,
            vec![("a".into(), vec![1.0]), ("b".into(), vec![2.0]), ("c".into(), vec![3.0])],
        )
        .unwrap();

        let m = build_embedding_matrix(&table, &tokenizer, 3);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.as_flat(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_from_entries_rejects_wrong_dim() {
        assert!(GloveTable::from_entries(3, vec![("x".to_string(), vec![1.0])]).is_err());
    }
}
