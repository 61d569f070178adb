//! Adversarial trainer.
//!
//! Each epoch runs `floor(windows / batch_size)` batches. A batch is drawn
//! uniformly with replacement from the whole training set, independently of
//! every other batch, so one epoch does not necessarily visit every window.
//!
//! Per batch:
//! 1. Discriminator step: real windows against ones plus detached generator
//!    output against zeros, one Adam step on the discriminator only.
//! 2. Generator step: fresh noise through the generator, scored by the
//!    discriminator against ones, one Adam step on the generator only.

use candle_core::{DType, Module, Tensor, Var};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, info};

use crate::encoding::TrainingSet;
use crate::error::{GanError, Result};
use crate::models::{binary_cross_entropy_with_logits, gradient_norm, AdversarialPair, Generator};

use super::history::{BatchLoss, EpochSummary, LossHistory};

/// Drives alternating discriminator and generator updates.
pub struct AdversarialTrainer {
    pair: AdversarialPair,
    generator_vars: Vec<Var>,
    discriminator_vars: Vec<Var>,
    generator_optimizer: AdamW,
    discriminator_optimizer: AdamW,
    rng: ChaCha8Rng,
    history: LossHistory,
}

impl AdversarialTrainer {
    /// Creates a trainer with one Adam optimizer per network.
    ///
    /// `seed` fixes batch sampling and latent noise; `None` seeds from
    /// system entropy.
    pub fn new(pair: AdversarialPair, seed: Option<u64>) -> Result<Self> {
        let params = ParamsAdamW {
            lr: pair.config.learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            weight_decay: 0.0,
        };

        let generator_vars = pair.generator_vars.all_vars();
        let discriminator_vars = pair.discriminator_vars.all_vars();
        let generator_optimizer = AdamW::new(generator_vars.clone(), params.clone())?;
        let discriminator_optimizer = AdamW::new(discriminator_vars.clone(), params)?;

        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            pair,
            generator_vars,
            discriminator_vars,
            generator_optimizer,
            discriminator_optimizer,
            rng,
            history: LossHistory::new(),
        })
    }

    /// Returns the networks being trained.
    pub fn pair(&self) -> &AdversarialPair {
        &self.pair
    }

    /// Returns the generator being trained.
    pub fn generator(&self) -> &Generator {
        &self.pair.generator
    }

    /// Returns the losses recorded so far.
    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    /// Returns the trainer's random source, shared with sample generation so
    /// a seeded run is reproducible end to end.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Consumes the trainer, returning the trained networks and the history.
    pub fn into_parts(self) -> (AdversarialPair, LossHistory) {
        (self.pair, self.history)
    }

    /// Trains for `epochs` epochs, calling `on_epoch` after each one.
    ///
    /// Fails before the first step if the batch size is zero or exceeds the
    /// number of windows, or if the window width does not match the networks.
    pub fn train<F>(
        &mut self,
        set: &TrainingSet,
        epochs: usize,
        batch_size: usize,
        mut on_epoch: F,
    ) -> Result<()>
    where
        F: FnMut(&EpochSummary, &mut AdversarialTrainer) -> Result<()>,
    {
        self.check_batch_size(set, batch_size)?;

        for epoch in 1..=epochs {
            let summary = self.train_epoch(set, epoch, batch_size)?;
            on_epoch(&summary, self)?;
        }

        Ok(())
    }

    /// Runs one epoch and returns its mean losses.
    pub fn train_epoch(
        &mut self,
        set: &TrainingSet,
        epoch: usize,
        batch_size: usize,
    ) -> Result<EpochSummary> {
        self.check_batch_size(set, batch_size)?;

        let n_batches = set.len() / batch_size;
        for batch in 1..=n_batches {
            let discriminator = self.discriminator_step(set, batch_size, epoch, batch)?;
            let generator = self.generator_step(batch_size, epoch, batch)?;

            debug!(epoch, batch, discriminator, generator, "batch complete");
            self.history.record_batch(BatchLoss {
                epoch,
                discriminator,
                generator,
            });
        }

        let summary = self.history.close_epoch(epoch);
        info!(
            epoch,
            batches = summary.batches,
            d_loss = summary.discriminator_loss,
            g_loss = summary.generator_loss,
            "epoch complete"
        );
        Ok(summary)
    }

    /// Draws `batch_size` standard-normal latent vectors.
    pub fn sample_latent(&mut self, batch_size: usize) -> Result<Tensor> {
        sample_latent(
            &mut self.rng,
            batch_size,
            self.pair.sequence_length(),
            &self.pair.device,
        )
    }

    fn check_batch_size(&self, set: &TrainingSet, batch_size: usize) -> Result<()> {
        if set.sequence_length() != self.pair.sequence_length() {
            return Err(GanError::invalid_config(format!(
                "training windows have length {}, networks expect {}",
                set.sequence_length(),
                self.pair.sequence_length()
            )));
        }
        if batch_size == 0 {
            return Err(GanError::invalid_config("batch_size must be > 0"));
        }
        if batch_size > set.len() {
            return Err(GanError::invalid_config(format!(
                "batch_size {} exceeds the {} available training windows",
                batch_size,
                set.len()
            )));
        }
        Ok(())
    }

    fn real_batch(&mut self, set: &TrainingSet, batch_size: usize) -> Result<Tensor> {
        let indices: Vec<usize> = (0..batch_size)
            .map(|_| self.rng.gen_range(0..set.len()))
            .collect();
        let rows = set.select(&indices);
        let values: Vec<f32> = rows.iter().copied().collect();
        Ok(Tensor::from_vec(
            values,
            (batch_size, set.sequence_length()),
            &self.pair.device,
        )?)
    }

    fn targets(&self, batch_size: usize, value: f64) -> Result<Tensor> {
        let ones = Tensor::ones((batch_size, 1), DType::F32, &self.pair.device)?;
        Ok(ones.affine(value, 0.0)?)
    }

    fn discriminator_step(
        &mut self,
        set: &TrainingSet,
        batch_size: usize,
        epoch: usize,
        batch: usize,
    ) -> Result<f32> {
        let real = self.real_batch(set, batch_size)?;
        let latent = self.sample_latent(batch_size)?;
        let fake = self.pair.generator.forward(&latent)?.detach();

        let discriminator = &self.pair.discriminator;
        let real_loss = binary_cross_entropy_with_logits(
            &discriminator.forward_logits(&real)?,
            &self.targets(batch_size, 1.0)?,
        )?;
        let fake_loss = binary_cross_entropy_with_logits(
            &discriminator.forward_logits(&fake)?,
            &self.targets(batch_size, 0.0)?,
        )?;
        let loss = real_loss.add(&fake_loss)?;

        let step = || format!("discriminator step (epoch {}, batch {})", epoch, batch);
        let value = finite_loss(&loss, "discriminator", &step)?;
        let grads = loss.backward()?;
        let norm = gradient_norm(&grads, &self.discriminator_vars)?;
        if !norm.is_finite() {
            return Err(GanError::non_finite("discriminator gradients", step()));
        }
        self.discriminator_optimizer.step(&grads)?;
        Ok(value)
    }

    fn generator_step(&mut self, batch_size: usize, epoch: usize, batch: usize) -> Result<f32> {
        let latent = self.sample_latent(batch_size)?;
        let fake = self.pair.generator.forward(&latent)?;
        let loss = binary_cross_entropy_with_logits(
            &self.pair.discriminator.forward_logits(&fake)?,
            &self.targets(batch_size, 1.0)?,
        )?;

        let step = || format!("generator step (epoch {}, batch {})", epoch, batch);
        let value = finite_loss(&loss, "generator", &step)?;
        let grads = loss.backward()?;
        let norm = gradient_norm(&grads, &self.generator_vars)?;
        if !norm.is_finite() {
            return Err(GanError::non_finite("generator gradients", step()));
        }
        self.generator_optimizer.step(&grads)?;
        Ok(value)
    }
}

/// Draws a `[batch_size, width]` tensor of independent standard-normal values.
pub fn sample_latent<R: Rng>(
    rng: &mut R,
    batch_size: usize,
    width: usize,
    device: &candle_core::Device,
) -> Result<Tensor> {
    let values: Vec<f32> = (0..batch_size * width)
        .map(|_| StandardNormal.sample(rng))
        .collect();
    Ok(Tensor::from_vec(values, (batch_size, width), device)?)
}

fn finite_loss(loss: &Tensor, network: &str, step: impl Fn() -> String) -> Result<f32> {
    let value = loss.to_scalar::<f32>()?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GanError::non_finite(network, step()))
    }
}
