// ============================================================
// Layer 5 — Evaluation
// ============================================================
// Runs a model over a DataLoader without gradients and
// reduces the batches to one loss and one accuracy.
//
// Loss is averaged per SAMPLE (each batch weighted by its
// size), so a short final batch does not skew the mean.
//
// Also rebuilds a trained model from a checkpoint directory
// for the `evaluate` command.

use anyhow::{ensure, Result};
use burn::{data::dataloader::DataLoader, prelude::*};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::{ModelKind, TrainConfig};
use crate::data::batcher::DigitBatch;
use crate::domain::digit::{IMAGE_PIXELS, IMAGE_SIDE, NUM_CLASSES};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    birnn::{BiRnn, BiRnnConfig},
    classifier::{ClassificationStep, DigitClassifier},
    dnn::{Dnn, DnnConfig},
    swish::{SwishNet, SwishNetConfig},
    InferBackend,
};

/// Mean loss and accuracy over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

/// Running sums for one pass over a loader.
#[derive(Debug, Default, Clone)]
pub struct MetricAccumulator {
    loss_sum: f64,
    correct:  usize,
    samples:  usize,
}

impl MetricAccumulator {
    pub fn add<B: Backend>(&mut self, step: &ClassificationStep<B>) {
        let n = step.batch_size();
        self.loss_sum += step.loss_value() * n as f64;
        self.correct  += step.correct();
        self.samples  += n;
    }

    pub fn finish(&self) -> EvalMetrics {
        if self.samples == 0 {
            return EvalMetrics { loss: f64::NAN, accuracy: 0.0, samples: 0 };
        }
        EvalMetrics {
            loss:     self.loss_sum / self.samples as f64,
            accuracy: self.correct as f64 / self.samples as f64,
            samples:  self.samples,
        }
    }
}

/// Loss and accuracy of `model` over every batch in `loader`.
pub fn evaluate<B, M>(model: &M, loader: &dyn DataLoader<DigitBatch<B>>) -> EvalMetrics
where
    B: Backend,
    M: DigitClassifier<B>,
{
    let mut acc = MetricAccumulator::default();
    for batch in loader.iter() {
        acc.add(&model.forward_classification(batch));
    }
    acc.finish()
}

// ─── Models restored from disk ────────────────────────────────────────────────
/// Whichever architecture the checkpoint was trained with.
#[derive(Debug)]
pub enum TrainedModel {
    Dnn(Dnn<InferBackend>),
    Swish(SwishNet<InferBackend>),
    BiRnn(BiRnn<InferBackend>),
}

impl DigitClassifier<InferBackend> for TrainedModel {
    fn forward(&self, images: Tensor<InferBackend, 3>) -> Tensor<InferBackend, 2> {
        match self {
            TrainedModel::Dnn(m)   => m.forward(images),
            TrainedModel::Swish(m) => m.forward(images),
            TrainedModel::BiRnn(m) => m.forward(images),
        }
    }
}

impl TrainedModel {
    /// Rebuild the architecture described by the saved config,
    /// then load the latest weights into it.
    pub fn from_checkpoint(
        ckpt:   &CheckpointManager,
        device: &<InferBackend as Backend>::Device,
    ) -> Result<(Self, TrainConfig)> {
        let cfg = ckpt.load_config()?;
        let model = match cfg.model {
            ModelKind::Dnn => {
                let m: Dnn<InferBackend> = DnnConfig::new(IMAGE_PIXELS, cfg.hidden_dim, NUM_CLASSES)
                    .with_dropout(cfg.dropout)
                    .init(device);
                TrainedModel::Dnn(ckpt.load_model(m, device)?)
            }
            ModelKind::Swish => {
                let m: SwishNet<InferBackend> = SwishNetConfig::new(IMAGE_PIXELS, cfg.hidden_dim, NUM_CLASSES)
                    .with_beta(cfg.swish_beta)
                    .init(device);
                TrainedModel::Swish(ckpt.load_model(m, device)?)
            }
            ModelKind::BiRnn => {
                let m: BiRnn<InferBackend> = BiRnnConfig::new(IMAGE_SIDE, cfg.hidden_dim, NUM_CLASSES)
                    .init(device);
                TrainedModel::BiRnn(ckpt.load_model(m, device)?)
            }
        };
        tracing::info!("Restored {:?} model from checkpoint", cfg.model);
        Ok((model, cfg))
    }

    /// Most likely digit and its probability for one image.
    pub fn predict(
        &self,
        pixels: &[f32],
        device: &<InferBackend as Backend>::Device,
    ) -> Result<(u8, f32)> {
        ensure!(
            pixels.len() == IMAGE_PIXELS,
            "expected {} pixels, got {}",
            IMAGE_PIXELS,
            pixels.len()
        );
        let images = Tensor::<InferBackend, 1>::from_floats(pixels, device)
            .reshape([1, IMAGE_SIDE, IMAGE_SIDE]);

        let probs: Vec<f32> = self
            .predict_proba(images)
            .into_data()
            .iter::<f32>()
            .collect();

        let (digit, p) = probs
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });

        Ok((digit as u8, p))
    }
}
