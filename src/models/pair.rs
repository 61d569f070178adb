//! The generator and discriminator together with their parameter stores.

use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};

use crate::error::{GanError, Result};
use crate::types::ModelConfig;

use super::discriminator::Discriminator;
use super::generator::Generator;

/// Both networks of the GAN, each owning a separate [`VarMap`] so their
/// optimizers never touch each other's weights.
pub struct AdversarialPair {
    /// Latent-to-sequence network.
    pub generator: Generator,
    /// Real-versus-generated classifier.
    pub discriminator: Discriminator,
    /// Trainable parameters of the generator.
    pub generator_vars: VarMap,
    /// Trainable parameters of the discriminator.
    pub discriminator_vars: VarMap,
    /// Layer sizes the networks were built with.
    pub config: ModelConfig,
    /// Device holding every parameter.
    pub device: Device,
}

impl AdversarialPair {
    /// Builds freshly initialized networks on `device`.
    pub fn new(config: &ModelConfig, device: &Device) -> Result<Self> {
        if let Some(reason) = config.validate() {
            return Err(GanError::invalid_config(reason));
        }

        let generator_vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&generator_vars, DType::F32, device);
        let generator = Generator::new(config, vb.pp("generator"))?;

        let discriminator_vars = VarMap::new();
        let vb = VarBuilder::from_varmap(&discriminator_vars, DType::F32, device);
        let discriminator = Discriminator::new(config, vb.pp("discriminator"))?;

        Ok(Self {
            generator,
            discriminator,
            generator_vars,
            discriminator_vars,
            config: config.clone(),
            device: device.clone(),
        })
    }

    /// Returns the window length both networks operate on.
    pub fn sequence_length(&self) -> usize {
        self.config.sequence_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn tiny_config() -> ModelConfig {
        ModelConfig {
            generator_hidden: 8,
            generator_wide: 8,
            discriminator_hidden: 8,
            discriminator_dense: 4,
            ..ModelConfig::with_sequence_length(5)
        }
    }

    #[test]
    fn parameter_stores_are_disjoint() {
        let pair = AdversarialPair::new(&tiny_config(), &Device::Cpu).unwrap();
        let generator = pair.generator_vars.data().lock().unwrap();
        let discriminator = pair.discriminator_vars.data().lock().unwrap();
        assert!(generator.keys().all(|k| k.starts_with("generator.")));
        assert!(discriminator.keys().all(|k| k.starts_with("discriminator.")));
        assert!(!generator.is_empty() && !discriminator.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ModelConfig {
            leaky_slope: 1.5,
            ..tiny_config()
        };
        let err = AdversarialPair::new(&config, &Device::Cpu).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidConfig);
    }
}
