//! Generator network.
//!
//! Maps a latent vector of width K to a K-length sequence of values in
//! [-1, 1]. Three stages run in order:
//!
//! 1. `Linear(K, K) -> ReLU -> Linear(K, K) -> tanh`
//! 2. One step of a single-layer LSTM with hidden size K, from a zero state
//! 3. `Linear(K, 256) -> ReLU -> Linear(256, 1024) -> ReLU -> Linear(1024, K) -> tanh`

use candle_core::{bail, Module, Result, Tensor};
use candle_nn::{linear, lstm, LSTMConfig, Linear, VarBuilder, LSTM, RNN};

use crate::types::ModelConfig;

/// Latent-to-sequence generator.
#[derive(Debug, Clone)]
pub struct Generator {
    input_fc1: Linear,
    input_fc2: Linear,
    lstm: LSTM,
    output_fc1: Linear,
    output_fc2: Linear,
    output_fc3: Linear,
    sequence_length: usize,
}

impl Generator {
    /// Creates a generator whose weights live under `vb`.
    pub fn new(config: &ModelConfig, vb: VarBuilder) -> Result<Self> {
        let k = config.sequence_length;
        Ok(Self {
            input_fc1: linear(k, k, vb.pp("input_fc1"))?,
            input_fc2: linear(k, k, vb.pp("input_fc2"))?,
            lstm: lstm(k, k, LSTMConfig::default(), vb.pp("lstm"))?,
            output_fc1: linear(k, config.generator_hidden, vb.pp("output_fc1"))?,
            output_fc2: linear(
                config.generator_hidden,
                config.generator_wide,
                vb.pp("output_fc2"),
            )?,
            output_fc3: linear(config.generator_wide, k, vb.pp("output_fc3"))?,
            sequence_length: k,
        })
    }

    /// Width of the latent input and of each generated sequence.
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }
}

impl Module for Generator {
    /// `latent` has shape `[batch, K]`; the output has the same shape.
    fn forward(&self, latent: &Tensor) -> Result<Tensor> {
        let (batch, width) = latent.dims2()?;
        if width != self.sequence_length {
            bail!(
                "generator expects latent width {}, got {}",
                self.sequence_length,
                width
            );
        }

        let xs = self.input_fc1.forward(latent)?.relu()?;
        let xs = self.input_fc2.forward(&xs)?.tanh()?;

        let state = self.lstm.zero_state(batch)?;
        let state = self.lstm.step(&xs, &state)?;
        let xs = state.h();

        let xs = self.output_fc1.forward(xs)?.relu()?;
        let xs = self.output_fc2.forward(&xs)?.relu()?;
        self.output_fc3.forward(&xs)?.tanh()
    }
}
