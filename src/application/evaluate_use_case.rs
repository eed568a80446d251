// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Reloads the model saved by `train` and scores it on the
// MNIST test partition:
//
//   Step 1: Read train_config.json + weights     (Layer 6 - infra)
//   Step 2: Load the test partition              (Layer 4 - data)
//   Step 3: Loss / accuracy over all batches     (Layer 5 - ml)
//   Step 4: Print predictions for the first few images (optional)

use anyhow::{ensure, Result};
use burn::data::dataloader::DataLoaderBuilder;

use crate::data::{batcher::DigitBatcher, dataset::DigitDataset};
use crate::domain::traits::DigitSource;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    default_device,
    evaluator::{evaluate, EvalMetrics, TrainedModel},
    InferBackend,
};

pub struct EvaluateUseCase {
    checkpoint_dir: String,
    batch_size:     usize,
    /// Number of test images whose prediction is printed
    preview:        usize,
}

impl EvaluateUseCase {
    pub fn new(checkpoint_dir: impl Into<String>, batch_size: usize) -> Self {
        Self { checkpoint_dir: checkpoint_dir.into(), batch_size, preview: 0 }
    }

    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }

    pub fn execute(&self, source: &impl DigitSource) -> Result<EvalMetrics> {
        ensure!(self.batch_size > 0, "batch size must be at least 1");

        let device = default_device();
        let ckpt   = CheckpointManager::new(&self.checkpoint_dir)?;
        let (model, cfg) = TrainedModel::from_checkpoint(&ckpt, &device)?;
        tracing::info!("Evaluating {:?} checkpoint from '{}'", cfg.model, self.checkpoint_dir);

        let test   = source.load_test()?;
        let shown: Vec<_> = test.iter().take(self.preview).cloned().collect();
        let loader = DataLoaderBuilder::new(DigitBatcher::<InferBackend>::new(device.clone()))
            .batch_size(self.batch_size)
            .build(DigitDataset::new(test));

        let metrics = evaluate(&model, loader.as_ref());
        tracing::info!("Evaluated {} test images", metrics.samples);
        println!("test_loss: {:.3}, test_acc: {:.3}", metrics.loss, metrics.accuracy);

        for (i, sample) in shown.iter().enumerate() {
            let (digit, p) = model.predict(&sample.pixels, &device)?;
            println!("image {i}: predicted {digit} (p={p:.3}), label {}", sample.label);
        }
        Ok(metrics)
    }
}
