// ============================================================
// Layer 6: Metrics Logger
// ============================================================
// Writes the training history to a CSV file, one row per
// epoch, so the learning curves can be plotted afterwards.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,train_acc,val_loss,val_acc
//   1,0.693100,0.512000,0.689000,0.540000
//   2,0.601200,0.688000,0.640100,0.621000
//
// Validation columns stay empty when the run has no
// validation data. Each training run starts a fresh file.
//
// Reading the curves:
//   - train_loss should fall epoch over epoch
//   - val_loss rising while train_loss falls means overfitting
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::history::EpochMetrics;

pub const CSV_HEADER: &str = "epoch,train_loss,train_acc,val_loss,val_acc";

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create `metrics.csv` in `dir`, replacing any previous run's file.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "{CSV_HEADER}")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(f, "{}", format_row(m))?;

        tracing::debug!("Logged epoch {} metrics: train_loss={:.4}", m.epoch, m.train_loss);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

fn format_row(m: &EpochMetrics) -> String {
    let opt = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();
    format!(
        "{},{:.6},{:.6},{},{}",
        m.epoch,
        m.train_loss,
        m.train_acc,
        opt(m.val_loss),
        opt(m.val_acc),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, val: Option<(f64, f64)>) -> EpochMetrics {
        EpochMetrics {
            epoch,
            train_loss: 0.5,
            train_acc:  0.75,
            val_loss:   val.map(|v| v.0),
            val_acc:    val.map(|v| v.1),
        }
    }

    #[test]
    fn test_rows_and_fresh_file_per_run() {
        let tmp = tempfile::tempdir().unwrap();

        let logger = MetricsLogger::new(tmp.path()).unwrap();
        logger.log(&metrics(1, Some((0.6, 0.7)))).unwrap();
        logger.log(&metrics(2, None)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![
            CSV_HEADER,
            "1,0.500000,0.750000,0.600000,0.700000",
            "2,0.500000,0.750000,,",
        ]);

        // A second run truncates the history
        let logger = MetricsLogger::new(tmp.path()).unwrap();
        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
