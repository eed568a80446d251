// ============================================================
// Layer 4 — Digit Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<DigitSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N DigitSamples, each with 784 pixels
//   Output: DigitBatch with images [N, 28, 28] and targets [N]
//
//   All pixels are flattened into one long Vec, then reshaped:
//   [s1_p1, ..., s1_p784, s2_p1, ..., sN_p784] → [N, 28, 28]
//
// Images keep their 2D shape so the BiRNN can read rows as
// time steps; the feed-forward models flatten back to [N, 784].

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::digit::{DigitSample, IMAGE_SIDE};

// ─── DigitBatch ───────────────────────────────────────────────────────────────
/// A batch of digits ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct DigitBatch<B: Backend> {
    /// Pixel intensities in [0, 1] — shape: [batch_size, 28, 28]
    pub images: Tensor<B, 3>,

    /// Class index per image — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── DigitBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct DigitBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> DigitBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<DigitSample, DigitBatch<B>> for DigitBatcher<B> {
    fn batch(&self, items: Vec<DigitSample>) -> DigitBatch<B> {
        let batch_size = items.len();

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, IMAGE_SIDE, IMAGE_SIDE]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        DigitBatch { images, targets }
    }
}
