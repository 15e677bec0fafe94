// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Saves and restores model weights with Burn's named, gzipped
// MessagePack file recorder.
//
// What gets saved:
//   1. Model weights (.mpk.gz file), once per epoch
//   2. latest_epoch.json, the most recent epoch written
//   3. train_config.json, written before training starts
//
// The config is needed to rebuild the same architecture
// (embedding size, recurrent stack, max_len) before the
// weights can be loaded into it.
//
// Parameters are stored at half precision, so a reloaded
// model agrees with the saved one to about three significant
// digits.
//
// File layout:
//   checkpoints/
//     model_epoch_1.mpk.gz
//     model_epoch_2.mpk.gz
//     ...
//     latest_epoch.json
//     train_config.json
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::SentimentModel;

const CONFIG_FILE: &str = "train_config.json";
const LATEST_FILE: &str = "latest_epoch.json";

/// Writes `<path>.mpk.gz`
type WeightsRecorder = NamedMpkGzFileRecorder<HalfPrecisionSettings>;

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", self.dir.display()))
    }

    /// Write the weights for `epoch` and move the latest-epoch pointer to it.
    pub fn save_model<B: Backend>(&self, model: &SentimentModel<B>, epoch: usize) -> Result<()> {
        self.ensure_dir()?;

        // The recorder appends the .mpk.gz extension
        let path = self.dir.join(format!("model_epoch_{epoch}"));
        WeightsRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let latest_path = self.dir.join(LATEST_FILE);
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", latest_path.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the most recently saved weights into `model`.
    ///
    /// `model` must have the architecture the weights were saved from.
    pub fn load_model<B: Backend>(&self, model: SentimentModel<B>, device: &B::Device) -> Result<SentimentModel<B>> {
        let epoch = self.latest_epoch()?;
        self.load_model_epoch(model, epoch, device)
    }

    pub fn load_model_epoch<B: Backend>(
        &self,
        model:  SentimentModel<B>,
        epoch:  usize,
        device: &B::Device,
    ) -> Result<SentimentModel<B>> {
        let path = self.dir.join(format!("model_epoch_{epoch}"));
        tracing::info!("Loading checkpoint from epoch {}", epoch);

        let record = WeightsRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?", path.display())
            })?;

        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.ensure_dir()?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!("Cannot read config from '{}'. Run 'train' first.", path.display())
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed training config in '{}'", path.display()))
    }

    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_FILE);
        let s = fs::read_to_string(&path).with_context(|| {
            format!("Cannot find '{}'. Run 'train' first.", path.display())
        })?;
        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sequence::PaddedSequences;
    use crate::ml::{evaluator::predict_proba, model::{Architecture, SentimentModelConfig}};
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_save_then_load_reproduces_predictions() {
        let tmp = tempfile::tempdir().unwrap();
        let device = Default::default();
        let cfg = SentimentModelConfig::new(Architecture::Lstm, 6, 4, 3).with_hidden_size(4);
        let ckpt = CheckpointManager::new(tmp.path().join("ckpt"));

        let model = cfg.init::<B>(&device);
        ckpt.save_model(&model, 1).unwrap();
        ckpt.save_model(&model, 2).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 2);
        assert!(tmp.path().join("ckpt/model_epoch_1.mpk.gz").exists());
        assert!(tmp.path().join("ckpt/model_epoch_2.mpk.gz").exists());
        assert!(!tmp.path().join("ckpt/model_epoch_2.mpk").exists());

        // A fresh init has different weights until the record is loaded
        let loaded = ckpt.load_model(cfg.init::<B>(&device), &device).unwrap();

        let seqs = PaddedSequences::from_rows(4, vec![vec![0, 1, 2, 3], vec![5, 4, 3, 2]]).unwrap();
        let before = predict_proba(&model, &seqs, 2, &device).unwrap();
        let after  = predict_proba(&loaded, &seqs, 2, &device).unwrap();
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }

    #[test]
    fn test_config_round_trip_and_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(tmp.path());

        assert!(ckpt.load_config().is_err());
        assert!(ckpt.latest_epoch().is_err());

        let cfg = TrainConfig { epochs: 3, architecture: Architecture::SimpleRnn, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        let back = ckpt.load_config().unwrap();
        assert_eq!(back.epochs, 3);
        assert_eq!(back.architecture, Architecture::SimpleRnn);
    }
}
