// ============================================================
// Layer 5 — Swish network
// ============================================================
// Same shape as the plain DNN but every hidden layer uses
//
//   swish_β(x) = x · σ(β·x)
//
// With β = 1 this is SiLU. No dropout: the Swish variant is
// trained without a validation split and without regularisation.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::ml::classifier::DigitClassifier;

/// x · sigmoid(beta · x), elementwise.
pub fn swish<B: Backend, const D: usize>(x: Tensor<B, D>, beta: f64) -> Tensor<B, D> {
    x.clone() * sigmoid(x * beta)
}

#[derive(Config, Debug)]
pub struct SwishNetConfig {
    pub input_dim:  usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    #[config(default = 3)]
    pub num_hidden: usize,
    #[config(default = 1.0)]
    pub beta:       f64,
}

impl SwishNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SwishNet<B> {
        let hidden = (0..self.num_hidden)
            .map(|i| {
                let d_in = if i == 0 { self.input_dim } else { self.hidden_dim };
                LinearConfig::new(d_in, self.hidden_dim).init(device)
            })
            .collect();
        let d_last = if self.num_hidden == 0 { self.input_dim } else { self.hidden_dim };
        SwishNet {
            hidden,
            output: LinearConfig::new(d_last, self.output_dim).init(device),
            beta:   self.beta,
        }
    }
}

#[derive(Module, Debug)]
pub struct SwishNet<B: Backend> {
    pub hidden: Vec<Linear<B>>,
    pub output: Linear<B>,
    pub beta:   f64,
}

impl<B: Backend> DigitClassifier<B> for SwishNet<B> {
    fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, height, width] = images.dims();
        let mut x = images.reshape([batch_size, height * width]);
        for layer in &self.hidden {
            x = swish(layer.forward(x), self.beta);
        }
        self.output.forward(x)
    }
}
