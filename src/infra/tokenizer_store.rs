// ============================================================
// Layer 6: Tokenizer Store
// ============================================================
// Persists the fitted Tokenizer as tokenizer.json next to the
// model weights, so evaluation and prediction map words to
// exactly the indices the model was trained on.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::data::tokenizer::Tokenizer;

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn save(&self, tokenizer: &Tokenizer) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.path();
        fs::write(&path, serde_json::to_string(tokenizer)?)
            .with_context(|| format!("Cannot write tokenizer to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer saved to '{}' ({} unique tokens, cap {})",
            path.display(),
            tokenizer.unique_tokens(),
            tokenizer.max_words()
        );
        Ok(())
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read tokenizer from '{}'. Run 'train' first.", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed tokenizer file '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(tmp.path().join("nested"));
        assert!(store.load().is_err());

        let tok = Tokenizer::fit(3, &["the cat and the hat"]);
        store.save(&tok).unwrap();

        let back = store.load().unwrap();
        assert_eq!(back.max_words(), 3);
        assert_eq!(back.text_to_sequence("the hat cat"), tok.text_to_sequence("the hat cat"));
        assert_eq!(back.index_of("hat"), tok.index_of("hat"));
    }
}
