// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model definitions and the training loop live here.
//
//   classifier.rs     — DigitClassifier trait shared by all models
//   dnn.rs            — ReLU + dropout feed-forward network
//   swish.rs          — Swish feed-forward network
//   birnn.rs          — bidirectional LSTM over image rows
//   trainer.rs        — epoch loop: train, validate, log, checkpoint
//   evaluator.rs      — loss/accuracy over a loader, checkpoint reload
//   early_stopping.rs — patience-based stop rule
//
// Backends:
//   Training uses TrainBackend (Autodiff<InferBackend>) for gradients.
//   model.valid() returns the same model on InferBackend, which is
//   also what evaluation and checkpoint reloading use.

pub mod classifier;
pub mod dnn;
pub mod swish;
pub mod birnn;
pub mod trainer;
pub mod evaluator;
pub mod early_stopping;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub fn default_device() -> <InferBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}
