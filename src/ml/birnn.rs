// ============================================================
// Layer 5 — Bidirectional LSTM classifier
// ============================================================
// Reads each image as a sequence: 28 time steps (rows), each
// with 28 features (the pixels of that row).
//
// Burn's BiLstm returns the full sequence [N, T, 2H] with the
// forward direction in [.., .., 0..H] and the backward
// direction in [.., .., H..2H], both aligned to input time.
//
// The summary of the whole image is:
//   forward  direction at the LAST step  (has seen rows 0..27)
//   backward direction at the FIRST step (has seen rows 27..0)
// concatenated into [N, 2H], then projected to 10 classes.

use burn::{
    nn::{BiLstm, BiLstmConfig, Initializer, Linear, LinearConfig},
    prelude::*,
};

use crate::ml::classifier::DigitClassifier;

#[derive(Config, Debug)]
pub struct BiRnnConfig {
    /// Features per time step (pixels per row)
    pub input_dim:  usize,
    /// Hidden units per direction
    pub hidden_dim: usize,
    pub output_dim: usize,
}

impl BiRnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BiRnn<B> {
        let lstm = BiLstmConfig::new(self.input_dim, self.hidden_dim, true)
            .with_initializer(Initializer::XavierNormal { gain: 1.0 })
            .init(device);
        let output = LinearConfig::new(2 * self.hidden_dim, self.output_dim)
            .with_initializer(Initializer::XavierNormal { gain: 1.0 })
            .init(device);
        BiRnn { lstm, output, hidden_dim: self.hidden_dim }
    }
}

#[derive(Module, Debug)]
pub struct BiRnn<B: Backend> {
    pub lstm:       BiLstm<B>,
    pub output:     Linear<B>,
    pub hidden_dim: usize,
}

impl<B: Backend> BiRnn<B> {
    /// [N, T, F] → [N, 2H]
    pub fn encode(&self, sequences: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, steps, _] = sequences.dims();
        let h = self.hidden_dim;

        let (outputs, _state) = self.lstm.forward(sequences, None);

        let forward_last = outputs
            .clone()
            .slice([0..batch_size, steps - 1..steps, 0..h])
            .reshape([batch_size, h]);
        let backward_first = outputs
            .slice([0..batch_size, 0..1, h..2 * h])
            .reshape([batch_size, h]);

        Tensor::cat(vec![forward_last, backward_first], 1)
    }
}

impl<B: Backend> DigitClassifier<B> for BiRnn<B> {
    fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        self.output.forward(self.encode(images))
    }
}
