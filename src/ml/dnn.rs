use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::classifier::DigitClassifier;

/// Feed-forward classifier: flatten → N × (Linear → ReLU → Dropout) → Linear.
#[derive(Config, Debug)]
pub struct DnnConfig {
    pub input_dim:  usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    #[config(default = 3)]
    pub num_hidden: usize,
    #[config(default = 0.5)]
    pub dropout:    f64,
}

impl DnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Dnn<B> {
        let hidden = (0..self.num_hidden)
            .map(|i| {
                let d_in = if i == 0 { self.input_dim } else { self.hidden_dim };
                LinearConfig::new(d_in, self.hidden_dim).init(device)
            })
            .collect();
        let d_last  = if self.num_hidden == 0 { self.input_dim } else { self.hidden_dim };
        let output  = LinearConfig::new(d_last, self.output_dim).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        Dnn { hidden, dropout, output }
    }
}

#[derive(Module, Debug)]
pub struct Dnn<B: Backend> {
    pub hidden:  Vec<Linear<B>>,
    // Only active on an autodiff backend, i.e. during training.
    pub dropout: Dropout,
    pub output:  Linear<B>,
}

impl<B: Backend> DigitClassifier<B> for Dnn<B> {
    fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        let [batch_size, height, width] = images.dims();
        let mut x = images.reshape([batch_size, height * width]);
        for layer in &self.hidden {
            x = self.dropout.forward(relu(layer.forward(x)));
        }
        self.output.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: Dnn<NdArray> = DnnConfig::new(784, 16, 10).init(&device);
        assert_eq!(model.hidden.len(), 3);

        let x = Tensor::<NdArray, 3>::zeros([4, 28, 28], &device);
        assert_eq!(model.forward(x).dims(), [4, 10]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = Default::default();
        let model: Dnn<NdArray> = DnnConfig::new(784, 8, 10).init(&device);
        let x = Tensor::<NdArray, 3>::ones([2, 28, 28], &device);

        let sums: Vec<f32> = model.predict_proba(x).sum_dim(1).into_data().iter::<f32>().collect();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-5);
        }
    }
}
