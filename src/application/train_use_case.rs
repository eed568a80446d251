// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load MNIST train + test partitions   (Layer 4 - data)
//   Step 3: Seeded train/validation split        (Layer 4 - data)
//   Step 4: Build datasets                       (Layer 4 - data)
//   Step 5: Save config + open metrics CSV       (Layer 6 - infra)
//   Step 6: Run training loop + test evaluation  (Layer 5 - ml)
//   Step 7: Plot the loss history (optional)     (Layer 6 - infra)

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::DigitDataset, splitter::split_train_val};
use crate::domain::traits::DigitSource;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger, plot};
use crate::ml::trainer::{run_training, SplitData, TrainingReport};

// ─── Model / optimiser choice ────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// ReLU feed-forward network with dropout
    Dnn,
    /// Swish feed-forward network
    Swish,
    /// Bidirectional LSTM over image rows
    BiRnn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    Sgd,
    Adam,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded by `evaluate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub model:          ModelKind,
    pub checkpoint_dir: String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub optimizer:      OptimizerKind,
    pub lr:             f64,
    pub hidden_dim:     usize,
    /// Dropout probability, dnn only
    pub dropout:        f64,
    /// β in x·σ(βx), swish only
    pub swish_beta:     f64,
    /// Share of the training partition held out for validation
    pub val_fraction:   f64,
    /// Early stopping patience in epochs; None trains for all epochs
    pub patience:       Option<usize>,
    pub seed:           u64,
    /// Only use the first N images of each MNIST partition
    pub limit:          Option<usize>,
    /// Draw the loss curve in the terminal after training
    pub plot:           bool,
}

impl TrainConfig {
    /// Hyperparameters each architecture was tuned with.
    pub fn preset(model: ModelKind) -> Self {
        let base = Self {
            model,
            checkpoint_dir: "checkpoints".to_string(),
            epochs:         100,
            batch_size:     100,
            optimizer:      OptimizerKind::Sgd,
            lr:             0.01,
            hidden_dim:     200,
            dropout:        0.5,
            swish_beta:     1.0,
            val_fraction:   0.2,
            patience:       None,
            seed:           123,
            limit:          None,
            plot:           false,
        };

        match model {
            ModelKind::Dnn => base,
            ModelKind::Swish => Self {
                epochs:       30,
                dropout:      0.0,
                val_fraction: 0.0,
                ..base
            },
            ModelKind::BiRnn => Self {
                epochs:       1000,
                optimizer:    OptimizerKind::Adam,
                lr:           0.001,
                hidden_dim:   25,
                dropout:      0.0,
                patience:     Some(5),
                ..base
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.epochs > 0, "epochs must be at least 1");
        ensure!(self.batch_size > 0, "batch size must be at least 1");
        ensure!(self.hidden_dim > 0, "hidden dimension must be at least 1");
        ensure!(self.lr > 0.0, "learning rate must be positive, got {}", self.lr);
        ensure!(
            (0.0..1.0).contains(&self.val_fraction),
            "validation fraction must be in [0, 1), got {}",
            self.val_fraction
        );
        ensure!(
            (0.0..1.0).contains(&self.dropout),
            "dropout must be in [0, 1), got {}",
            self.dropout
        );
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::preset(ModelKind::Dnn)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self, source: &impl DigitSource) -> Result<TrainingReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 2: Load MNIST ───────────────────────────────────────────────
        let train_all = source.load_train()?;
        let test      = source.load_test()?;

        // ── Step 3: Train / validation split ─────────────────────────────────
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let (train, val) = split_train_val(train_all, 1.0 - cfg.val_fraction, &mut rng);
        ensure!(!train.is_empty(), "no training samples left after the split");
        tracing::info!(
            "Split: {} train, {} validation, {} test",
            train.len(),
            val.len(),
            test.len()
        );

        // ── Step 4: Build Burn datasets ──────────────────────────────────────
        let data = SplitData {
            train: DigitDataset::new(train),
            val:   if val.is_empty() { None } else { Some(DigitDataset::new(val)) },
            test:  DigitDataset::new(test),
        };
        tracing::debug!("Training class counts: {:?}", data.train.class_counts());

        // ── Step 5: Persist config, open metrics log ─────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 6: Run training loop (Layer 5) ──────────────────────────────
        let report = run_training(cfg, data, &ckpt_manager, &metrics)?;

        // ── Step 7: Loss curve ───────────────────────────────────────────────
        if cfg.plot {
            plot::plot_loss(&report.history);
        }

        Ok(report)
    }
}
