// ============================================================
// Layer 5: Simple (Elman) Recurrent Layer
// ============================================================
// Burn ships LSTM and GRU but no plain RNN, so this one is
// assembled from two Linear layers:
//
//   h_0 = 0
//   h_t = tanh(W_x · x_t + b + W_h · h_{t-1})
//
// The input projection is applied to the whole sequence in one
// matmul; only the recurrent part runs step by step. Every
// timestep's hidden state is returned so layers can be stacked;
// the classifier keeps the last one.
//
// A plain RNN struggles to carry information across long
// sequences (vanishing gradients); LSTM's gated cell state is
// the usual fix.
//
// Reference: Elman (1990) Finding Structure in Time

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};

#[derive(Config, Debug)]
pub struct SimpleRnnConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
}

impl SimpleRnnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SimpleRnn<B> {
        SimpleRnn {
            input:     LinearConfig::new(self.d_input, self.d_hidden).init(device),
            recurrent: LinearConfig::new(self.d_hidden, self.d_hidden)
                .with_bias(false)
                .init(device),
            d_hidden:  self.d_hidden,
        }
    }
}

#[derive(Module, Debug)]
pub struct SimpleRnn<B: Backend> {
    /// W_x and b
    pub input:     Linear<B>,
    /// W_h
    pub recurrent: Linear<B>,
    pub d_hidden:  usize,
}

impl<B: Backend> SimpleRnn<B> {
    /// x: [batch, seq_len, d_input] → hidden states: [batch, seq_len, d_hidden]
    ///
    /// `seq_len` must be at least 1.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let [batch, seq_len, _] = x.dims();
        let device = x.device();

        let projected = self.input.forward(x); // [batch, seq_len, d_hidden]

        let mut h = Tensor::<B, 2>::zeros([batch, self.d_hidden], &device);
        let mut states = Vec::with_capacity(seq_len);

        for t in 0..seq_len {
            let x_t = projected
                .clone()
                .slice([0..batch, t..t + 1, 0..self.d_hidden])
                .reshape([batch, self.d_hidden]);
            h = activation::tanh(x_t + self.recurrent.forward(h));
            states.push(h.clone().unsqueeze_dim::<3>(1));
        }

        Tensor::cat(states, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_output_shape() {
        let device = Default::default();
        let rnn = SimpleRnnConfig::new(4, 3).init::<B>(&device);
        let x = Tensor::<B, 3>::ones([2, 5, 4], &device);
        assert_eq!(rnn.forward(x).dims(), [2, 5, 3]);
    }

    #[test]
    fn test_hidden_states_are_bounded_by_tanh() {
        let device = Default::default();
        let rnn = SimpleRnnConfig::new(2, 6).init::<B>(&device);
        let x = Tensor::<B, 3>::ones([1, 8, 2], &device).mul_scalar(50.0);
        let values: Vec<f32> = rnn.forward(x).into_data().convert::<f32>().to_vec().unwrap();
        assert!(values.iter().all(|v| v.abs() <= 1.0));
    }

    #[test]
    fn test_first_step_ignores_recurrent_weights() {
        // With h_0 = 0 the first state is tanh(W_x x_0 + b) regardless of W_h
        let device = Default::default();
        let rnn = SimpleRnnConfig::new(3, 2).init::<B>(&device);
        let x = Tensor::<B, 3>::ones([1, 1, 3], &device);

        let expected = activation::tanh(rnn.input.forward(x.clone()));
        let got = rnn.forward(x);

        let a: Vec<f32> = expected.into_data().convert::<f32>().to_vec().unwrap();
        let b: Vec<f32> = got.into_data().convert::<f32>().to_vec().unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
