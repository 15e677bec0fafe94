use anyhow::{ensure, Result};
use burn::{
    module::Param,
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation,
};
use serde::{Deserialize, Serialize};

use crate::data::glove::EmbeddingMatrix;
use crate::ml::rnn::{SimpleRnn, SimpleRnnConfig};

/// What sits between the embedding lookup and the dense output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    /// [N, L, D] embeddings flattened to [N, L·D]
    Flatten,
    /// Stack of tanh recurrent layers
    SimpleRnn,
    /// Stack of LSTM layers
    Lstm,
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Architecture::Flatten   => write!(f, "flatten"),
            Architecture::SimpleRnn => write!(f, "simple-rnn"),
            Architecture::Lstm      => write!(f, "lstm"),
        }
    }
}

#[derive(Config, Debug)]
pub struct SentimentModelConfig {
    pub architecture:  Architecture,
    /// Rows in the embedding table; every token id must be below this
    pub vocab_size:    usize,
    /// Padded sequence length (the flatten head depends on it)
    pub max_len:       usize,
    pub embedding_dim: usize,
    #[config(default = 32)]
    pub hidden_size:   usize,
    /// Recurrent layers to stack (ignored by Flatten)
    #[config(default = 1)]
    pub recurrent_layers: usize,
}

impl SentimentModelConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.vocab_size > 0, "vocab_size must be positive");
        ensure!(self.max_len > 0, "max_len must be positive");
        ensure!(self.embedding_dim > 0, "embedding_dim must be positive");
        if self.architecture != Architecture::Flatten {
            ensure!(self.hidden_size > 0, "hidden_size must be positive");
            ensure!(self.recurrent_layers > 0, "recurrent_layers must be at least 1");
        }
        Ok(())
    }

    /// Randomly initialised model with a trainable embedding table.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device);
        self.assemble(embedding, device)
    }

    /// Model whose embedding table is loaded from `matrix`.
    ///
    /// With `freeze` the table is excluded from gradient updates.
    pub fn init_with_embeddings<B: Backend>(
        &self,
        matrix: &EmbeddingMatrix,
        freeze: bool,
        device: &B::Device,
    ) -> Result<SentimentModel<B>> {
        ensure!(
            matrix.rows() == self.vocab_size && matrix.dim() == self.embedding_dim,
            "embedding matrix is {}x{} but the model expects {}x{}",
            matrix.rows(), matrix.dim(), self.vocab_size, self.embedding_dim
        );

        let weight = Tensor::<B, 2>::from_data(
            TensorData::new(matrix.as_flat().to_vec(), [matrix.rows(), matrix.dim()]),
            device,
        );
        let mut embedding = Embedding { weight: Param::from_tensor(weight) };
        if freeze {
            embedding = embedding.no_grad();
        }

        Ok(self.assemble(embedding, device))
    }

    fn assemble<B: Backend>(&self, embedding: Embedding<B>, device: &B::Device) -> SentimentModel<B> {
        let recurrent: Vec<RecurrentLayer<B>> = match self.architecture {
            Architecture::Flatten => Vec::new(),
            Architecture::SimpleRnn => (0..self.recurrent_layers)
                .map(|i| {
                    let d_input = self.layer_input(i);
                    RecurrentLayer::Simple(SimpleRnnConfig::new(d_input, self.hidden_size).init(device))
                })
                .collect(),
            Architecture::Lstm => (0..self.recurrent_layers)
                .map(|i| {
                    let d_input = self.layer_input(i);
                    RecurrentLayer::Gated(LstmConfig::new(d_input, self.hidden_size, true).init(device))
                })
                .collect(),
        };

        let dense_input = if recurrent.is_empty() {
            self.max_len * self.embedding_dim
        } else {
            self.hidden_size
        };
        let dense = LinearConfig::new(dense_input, 1).init(device);

        SentimentModel { embedding, recurrent, dense }
    }

    fn layer_input(&self, layer: usize) -> usize {
        if layer == 0 { self.embedding_dim } else { self.hidden_size }
    }
}

/// One recurrent stage of the stack.
#[derive(Module, Debug)]
pub enum RecurrentLayer<B: Backend> {
    Simple(SimpleRnn<B>),
    Gated(Lstm<B>),
}

impl<B: Backend> RecurrentLayer<B> {
    /// [batch, seq_len, d_in] → [batch, seq_len, hidden]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        match self {
            RecurrentLayer::Simple(rnn) => rnn.forward(x),
            RecurrentLayer::Gated(lstm) => lstm.forward(x, None).0,
        }
    }
}

#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub embedding: Embedding<B>,
    /// Empty for the flatten architecture
    pub recurrent: Vec<RecurrentLayer<B>>,
    pub dense:     Linear<B>,
}

impl<B: Backend> SentimentModel<B> {
    /// tokens: [batch, max_len] → logits: [batch, 1]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch_size, _] = tokens.dims();
        let x = self.embedding.forward(tokens); // [batch, max_len, embedding_dim]

        if self.recurrent.is_empty() {
            let [_, seq_len, dim] = x.dims();
            return self.dense.forward(x.reshape([batch_size, seq_len * dim]));
        }

        let mut x = x;
        for layer in &self.recurrent {
            x = layer.forward(x);
        }

        // Only the final timestep feeds the classifier.
        let [_, seq_len, hidden] = x.dims();
        let last = x
            .slice([0..batch_size, seq_len - 1..seq_len, 0..hidden])
            .reshape([batch_size, hidden]);
        self.dense.forward(last)
    }

    /// Positive-class probabilities: [batch, 1], each in (0, 1)
    pub fn predict_proba(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        activation::sigmoid(self.forward(tokens))
    }

    /// Binary cross-entropy on logits; labels: [batch, 1] of 0/1
    pub fn forward_loss(
        &self,
        tokens: Tensor<B, 2, Int>,
        labels: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(tokens);
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), labels);
        (loss, logits)
    }
}

/// How many logits land on the right side of 0 for their label.
pub fn correct_predictions<B: Backend>(logits: Tensor<B, 2>, labels: Tensor<B, 2, Int>) -> usize {
    let correct: i64 = logits
        .greater_elem(0.0)
        .int()
        .equal(labels)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    fn tokens(rows: usize, len: usize) -> Tensor<B, 2, Int> {
        let ids: Vec<i32> = (0..rows * len).map(|i| (i % 7) as i32).collect();
        Tensor::from_data(TensorData::new(ids, [rows, len]), &Default::default())
    }

    fn probs(t: Tensor<B, 2>) -> Vec<f32> {
        t.into_data().convert::<f32>().to_vec().unwrap()
    }

    #[test]
    fn test_flatten_shapes_and_probabilities() {
        let device = Default::default();
        let cfg = SentimentModelConfig::new(Architecture::Flatten, 10, 5, 8);
        let model = cfg.init::<B>(&device);

        assert!(model.recurrent.is_empty());
        // dense sees L·D inputs
        assert_eq!(model.dense.weight.val().dims(), [5 * 8, 1]);

        let p = model.predict_proba(tokens(3, 5));
        assert_eq!(p.dims(), [3, 1]);
        assert!(probs(p).iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_recurrent_stacks() {
        let device = Default::default();
        for arch in [Architecture::SimpleRnn, Architecture::Lstm] {
            let cfg = SentimentModelConfig::new(arch, 10, 6, 4)
                .with_hidden_size(3)
                .with_recurrent_layers(2);
            let model = cfg.init::<B>(&device);
            assert_eq!(model.recurrent.len(), 2);
            assert_eq!(model.forward(tokens(2, 6)).dims(), [2, 1]);
        }
    }

    #[test]
    fn test_loss_is_positive_scalar() {
        let device = Default::default();
        let model = SentimentModelConfig::new(Architecture::Lstm, 10, 4, 4).init::<B>(&device);
        let labels = Tensor::<B, 2, Int>::from_data(TensorData::new(vec![1i32, 0], [2, 1]), &device);
        let (loss, logits) = model.forward_loss(tokens(2, 4), labels);
        assert_eq!(logits.dims(), [2, 1]);
        let loss: f32 = loss.into_scalar().elem::<f32>();
        assert!(loss.is_finite() && loss > 0.0);
    }

    #[test]
    fn test_pretrained_embeddings_are_loaded() {
        use crate::data::{glove::{build_embedding_matrix, GloveTable}, tokenizer::Tokenizer};

        let device = Default::default();
        let tokenizer = Tokenizer::fit(4, &["good bad"]);
        let table = GloveTable::from_entries(
            2,
            vec![("good".to_string(), vec![0.5, 0.25]), ("bad".to_string(), vec![-0.5, -0.25])],
        )
        .unwrap();
        let matrix = build_embedding_matrix(&table, &tokenizer, 4);

        let cfg = SentimentModelConfig::new(Architecture::Flatten, 4, 3, 2);
        let model = cfg.init_with_embeddings::<B>(&matrix, true, &device).unwrap();
        let weights = probs(model.embedding.weight.val());
        assert_eq!(weights, vec![0.0, 0.0, 0.5, 0.25, -0.5, -0.25, 0.0, 0.0]);

        let wrong = SentimentModelConfig::new(Architecture::Flatten, 5, 3, 2);
        assert!(wrong.init_with_embeddings::<B>(&matrix, true, &device).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(SentimentModelConfig::new(Architecture::Flatten, 10, 0, 4).validate().is_err());
        assert!(SentimentModelConfig::new(Architecture::Lstm, 10, 5, 4)
            .with_recurrent_layers(0)
            .validate()
            .is_err());
        assert!(SentimentModelConfig::new(Architecture::Flatten, 10, 5, 4)
            .with_recurrent_layers(0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_correct_predictions() {
        let device = Default::default();
        let logits = Tensor::<B, 2>::from_data(TensorData::new(vec![2.0f32, -1.0, 0.5], [3, 1]), &device);
        let labels = Tensor::<B, 2, Int>::from_data(TensorData::new(vec![1i32, 0, 0], [3, 1]), &device);
        assert_eq!(correct_predictions(logits, labels), 2);
    }
}
