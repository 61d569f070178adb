//! ModelConfig type for the generator and discriminator networks.
//!
//! Holds the layer sizes shared by both networks. `sequence_length` is the
//! width of every training window, latent vector and generated sequence.

use serde::{Deserialize, Serialize};

/// Default number of tokens per training window.
pub const DEFAULT_SEQUENCE_LENGTH: usize = 100;

/// Layer sizes and optimizer settings for the adversarial pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Tokens per window. Also the latent and generator LSTM width.
    pub sequence_length: usize,

    /// Width of the first layer of the generator's output stack.
    pub generator_hidden: usize,

    /// Width of the second layer of the generator's output stack.
    pub generator_wide: usize,

    /// Hidden size of both discriminator LSTM layers.
    pub discriminator_hidden: usize,

    /// Width of the discriminator's second dense layer.
    pub discriminator_dense: usize,

    /// Negative slope of the discriminator's LeakyReLU.
    pub leaky_slope: f64,

    /// Adam learning rate, shared value but separate state per network.
    pub learning_rate: f64,
}

impl ModelConfig {
    /// Creates the default configuration for a given window length.
    pub fn with_sequence_length(sequence_length: usize) -> Self {
        Self {
            sequence_length,
            ..Self::default()
        }
    }

    /// Validates the configuration for consistency.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.sequence_length == 0 {
            return Some("sequence_length must be > 0".to_string());
        }

        if self.generator_hidden == 0 || self.generator_wide == 0 {
            return Some("generator layer sizes must be > 0".to_string());
        }

        if self.discriminator_hidden == 0 || self.discriminator_dense == 0 {
            return Some("discriminator layer sizes must be > 0".to_string());
        }

        if !(0.0..1.0).contains(&self.leaky_slope) {
            return Some(format!(
                "leaky_slope must be in [0, 1), got {}",
                self.leaky_slope
            ));
        }

        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Some(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        None
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            generator_hidden: 256,
            generator_wide: 1024,
            discriminator_hidden: 512,
            discriminator_dense: 256,
            leaky_slope: 0.01,
            learning_rate: 1e-4,
        }
    }
}
