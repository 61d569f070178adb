//! Discriminator network.
//!
//! Scores a `[batch, K]` sequence with the probability that it came from
//! the corpus: two stacked LSTM layers run one step from a zero state, then
//! `Linear(H, H) -> LeakyReLU -> Linear(H, 256) -> LeakyReLU -> Linear(256, 1)`.
//! The LSTM state is sized from the batch actually passed in, so any batch
//! size works.

use candle_core::{bail, Module, Result, Tensor};
use candle_nn::{linear, lstm, LSTMConfig, Linear, VarBuilder, LSTM, RNN};

use crate::types::ModelConfig;

use super::layers::leaky_relu;

/// Real-versus-generated classifier.
#[derive(Debug, Clone)]
pub struct Discriminator {
    lstm1: LSTM,
    lstm2: LSTM,
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
    leaky_slope: f64,
    sequence_length: usize,
}

impl Discriminator {
    /// Creates a discriminator whose weights live under `vb`.
    pub fn new(config: &ModelConfig, vb: VarBuilder) -> Result<Self> {
        let k = config.sequence_length;
        let hidden = config.discriminator_hidden;
        let dense = config.discriminator_dense;
        Ok(Self {
            lstm1: lstm(k, hidden, LSTMConfig::default(), vb.pp("lstm1"))?,
            lstm2: lstm(hidden, hidden, LSTMConfig::default(), vb.pp("lstm2"))?,
            fc1: linear(hidden, hidden, vb.pp("fc1"))?,
            fc2: linear(hidden, dense, vb.pp("fc2"))?,
            fc3: linear(dense, 1, vb.pp("fc3"))?,
            leaky_slope: config.leaky_slope,
            sequence_length: k,
        })
    }

    /// Returns pre-sigmoid scores of shape `[batch, 1]`.
    pub fn forward_logits(&self, xs: &Tensor) -> Result<Tensor> {
        let (batch, width) = xs.dims2()?;
        if width != self.sequence_length {
            bail!(
                "discriminator expects sequence width {}, got {}",
                self.sequence_length,
                width
            );
        }

        let state = self.lstm1.step(xs, &self.lstm1.zero_state(batch)?)?;
        let state = self.lstm2.step(state.h(), &self.lstm2.zero_state(batch)?)?;

        let xs = leaky_relu(&self.fc1.forward(state.h())?, self.leaky_slope)?;
        let xs = leaky_relu(&self.fc2.forward(&xs)?, self.leaky_slope)?;
        self.fc3.forward(&xs)
    }
}

impl Module for Discriminator {
    /// Returns probabilities in (0, 1) of shape `[batch, 1]`.
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        candle_nn::ops::sigmoid(&self.forward_logits(xs)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    fn discriminator(k: usize) -> Discriminator {
        let config = ModelConfig {
            discriminator_hidden: 24,
            discriminator_dense: 12,
            ..ModelConfig::with_sequence_length(k)
        };
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        Discriminator::new(&config, vb).unwrap()
    }

    #[test]
    fn probabilities_for_any_batch() {
        let network = discriminator(10);
        for batch in [1, 3, 17] {
            let xs = Tensor::rand(-1f32, 1.0, (batch, 10), &Device::Cpu).unwrap();
            let probs = network.forward(&xs).unwrap();
            assert_eq!(probs.dims(), &[batch, 1]);
            let values: Vec<f32> = probs.flatten_all().unwrap().to_vec1().unwrap();
            assert!(values.iter().all(|p| *p > 0.0 && *p < 1.0));
        }
    }

    #[test]
    fn logits_feed_the_sigmoid() {
        let network = discriminator(6);
        let xs = Tensor::rand(-1f32, 1.0, (4, 6), &Device::Cpu).unwrap();
        let logits: Vec<f32> = network
            .forward_logits(&xs)
            .unwrap()
            .flatten_all()
            .unwrap()
            .to_vec1()
            .unwrap();
        let probs: Vec<f32> = network
            .forward(&xs)
            .unwrap()
            .flatten_all()
            .unwrap()
            .to_vec1()
            .unwrap();
        for (logit, prob) in logits.iter().zip(&probs) {
            let expected = 1.0 / (1.0 + (-logit).exp());
            assert!((expected - prob).abs() < 1e-5);
        }
    }

    #[test]
    fn rejects_wrong_width() {
        let network = discriminator(6);
        let xs = Tensor::zeros((2, 5), DType::F32, &Device::Cpu).unwrap();
        assert!(network.forward(&xs).is_err());
    }
}
