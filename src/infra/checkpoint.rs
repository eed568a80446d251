// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model weights using Burn's CompactRecorder.
//
// What gets saved:
//   1. Model weights (model.mpk.gz) — overwritten every epoch
//   2. latest_epoch.json            — which epoch those weights are from
//   3. train_config.json            — architecture + hyperparameters
//
// The config is needed to rebuild the exact architecture
// (model kind, hidden size, beta, ...) before the weights can
// be loaded back into it.
//
// Burn's CompactRecorder:
//   - Serialises model parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Stores floats at half precision
//   - Type-safe: loading fails if architecture doesn't match
//
// File layout:
//   checkpoints/
//     model.mpk.gz
//     latest_epoch.json
//     train_config.json
//     metrics.csv          ← written by MetricsLogger

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::CompactRecorder,
};

use crate::application::train_use_case::TrainConfig;

const MODEL_FILE:  &str = "model";
const EPOCH_FILE:  &str = "latest_epoch.json";
const CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory
    /// (and its parents) if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Save model weights and record which epoch they belong to.
    /// The recorder appends the .mpk.gz extension itself.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M, epoch: usize) -> Result<()> {
        let path = self.dir.join(MODEL_FILE);

        model
            .clone()
            .save_file(path.clone(), &CompactRecorder::new())
            .map_err(|e| anyhow::anyhow!("Failed to save checkpoint to '{}': {e:?}", path.display()))?;

        let latest_path = self.dir.join(EPOCH_FILE);
        fs::write(&latest_path, serde_json::to_string(&epoch)?)
            .with_context(|| format!("Failed to write '{}'", latest_path.display()))?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the saved weights into `model`.
    ///
    /// The model parameter must have the same architecture as the
    /// saved checkpoint or loading will fail.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        let epoch = self.latest_epoch()?;
        let path  = self.dir.join(MODEL_FILE);

        tracing::info!("Loading checkpoint from epoch {}", epoch);

        model
            .load_file(path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Cannot load checkpoint '{}'. Have you trained the model first? ({e:?})",
                    path.display()
                )
            })
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. \
                 Make sure you have run 'train' before 'evaluate'.",
                path.display()
            )
        })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Epoch number of the saved weights.
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(EPOCH_FILE);

        let s = fs::read_to_string(&path)
            .with_context(|| format!("Cannot find '{}'. Have you run 'train' first?", path.display()))?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use crate::application::train_use_case::ModelKind;
    use crate::ml::dnn::{Dnn, DnnConfig};

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nested/ckpt")).unwrap();

        let cfg = TrainConfig::preset(ModelKind::Swish);
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_model_save_and_load() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = Default::default();

        let model: Dnn<NdArray> = DnnConfig::new(784, 4, 10).init(&device);
        ckpt.save_model(&model, 3).unwrap();
        assert_eq!(ckpt.latest_epoch().unwrap(), 3);

        let fresh: Dnn<NdArray> = DnnConfig::new(784, 4, 10).init(&device);
        assert!(ckpt.load_model(fresh, &device).is_ok());
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        assert!(ckpt.load_config().is_err());
        assert!(ckpt.latest_epoch().is_err());
    }
}
