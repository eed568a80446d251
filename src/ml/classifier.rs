// ============================================================
// Layer 5 — DigitClassifier trait
// ============================================================
// The seam between the three architectures and the shared
// training / evaluation code.
//
// Every model maps a batch of images [N, 28, 28] to raw class
// scores [N, 10]. Softmax is NOT applied in forward():
// Burn's CrossEntropyLoss expects logits and applies
// log-softmax itself, which is numerically safer than
// softmax followed by log.

use burn::{
    nn::loss::CrossEntropyLossConfig,
    prelude::*,
    tensor::activation::softmax,
};

use crate::data::batcher::DigitBatch;

pub trait DigitClassifier<B: Backend> {
    /// images: [batch, 28, 28] → logits: [batch, 10]
    fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2>;

    /// Class probabilities, rows sum to 1
    fn predict_proba(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        softmax(self.forward(images), 1)
    }

    /// Forward pass plus sparse categorical cross-entropy.
    fn forward_classification(&self, batch: DigitBatch<B>) -> ClassificationStep<B> {
        let logits = self.forward(batch.images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), batch.targets.clone());

        ClassificationStep { loss, logits, targets: batch.targets }
    }
}

/// Output of one forward pass over a labelled batch.
pub struct ClassificationStep<B: Backend> {
    /// Mean cross-entropy over the batch — shape [1]
    pub loss:    Tensor<B, 1>,
    pub logits:  Tensor<B, 2>,
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> ClassificationStep<B> {
    pub fn batch_size(&self) -> usize {
        self.targets.dims()[0]
    }

    pub fn loss_value(&self) -> f64 {
        self.loss.clone().into_scalar().elem::<f64>()
    }

    /// Number of rows whose argmax matches the target.
    pub fn correct(&self) -> usize {
        // argmax(1) returns shape [batch, 1], flatten to [batch]
        let predicted = self.logits.clone().argmax(1).flatten::<1>(0, 1);
        let hits: i64 = predicted
            .equal(self.targets.clone())
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        hits as usize
    }
}
