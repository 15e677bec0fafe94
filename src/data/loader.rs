// ============================================================
// Layer 4: IMDB Review Loader
// ============================================================
// Loads the labelled reviews of one IMDB split directory:
//
//   aclImdb/train/
//     neg/   0_3.txt  1_1.txt  ...   → label 0
//     pos/   0_9.txt  1_7.txt  ...   → label 1
//
// Other entries under the split (unsup/, urls_*.txt, the
// .feat files) are ignored.
//
// File names are sorted within each class directory for both
// the training and the test split, so the loaded order is
// reproducible; any randomisation is applied afterwards by
// the splitter with an explicit seed.
//
// A missing class directory or an unreadable review is a
// fatal error: silently training on half a corpus would be
// worse than stopping.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::review::{Review, Sentiment};
use crate::domain::traits::ReviewSource;

/// Loads `neg/*.txt` and `pos/*.txt` from a split directory.
/// Implements the ReviewSource trait from Layer 3.
pub struct ImdbLoader {
    /// Split directory, e.g. `aclImdb/train`
    dir: PathBuf,
}

impl ImdbLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReviewSource for ImdbLoader {
    fn load_all(&self) -> Result<Vec<Review>> {
        if !self.dir.is_dir() {
            bail!("Data directory '{}' does not exist", self.dir.display());
        }

        let mut reviews = Vec::new();

        for sentiment in [Sentiment::Negative, Sentiment::Positive] {
            let class_dir = self.dir.join(sentiment.dir_name());
            let files = list_reviews(&class_dir)?;
            tracing::info!(
                "Found {} {} reviews in '{}'",
                files.len(),
                sentiment,
                class_dir.display()
            );

            for path in files {
                reviews.push(load_single_review(&path, sentiment)?);
            }
        }

        tracing::info!("Successfully loaded {} reviews", reviews.len());
        Ok(reviews)
    }
}

/// Sorted paths of every `.txt` file directly inside `dir`.
fn list_reviews(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!(
            "Class directory '{}' does not exist (expected neg/ and pos/ under the data directory)",
            dir.display()
        );
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn load_single_review(path: &Path, sentiment: Sentiment) -> Result<Review> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    // A handful of IMDB reviews carry stray Latin-1 bytes
    let text = String::from_utf8_lossy(&bytes).into_owned();

    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(Review::new(source, text, sentiment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, body: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_loads_both_classes_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "neg/1_2.txt", "dull");
        write(tmp.path(), "neg/0_1.txt", "awful");
        write(tmp.path(), "pos/0_9.txt", "superb");
        write(tmp.path(), "pos/notes.md", "ignored");
        write(tmp.path(), "unsup/5_0.txt", "ignored");

        let reviews = ImdbLoader::new(tmp.path()).load_all().unwrap();

        let summary: Vec<(&str, u8)> = reviews
            .iter()
            .map(|r| (r.text.as_str(), r.sentiment.label()))
            .collect();
        assert_eq!(summary, vec![("awful", 0), ("dull", 0), ("superb", 1)]);
        assert_eq!(reviews[0].source, "0_1.txt");
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = ImdbLoader::new(tmp.path().join("nope"));
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_missing_class_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "neg/0_1.txt", "awful");
        let err = ImdbLoader::new(tmp.path()).load_all().unwrap_err();
        assert!(err.to_string().contains("pos"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("neg")).unwrap();
        fs::create_dir_all(tmp.path().join("pos")).unwrap();
        fs::write(tmp.path().join("pos/0_8.txt"), b"caf\xe9 scene").unwrap();

        let reviews = ImdbLoader::new(tmp.path()).load_all().unwrap();
        assert_eq!(reviews.len(), 1);
        assert!(reviews[0].text.starts_with("caf"));
    }
}
