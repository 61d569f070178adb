//! Loss bookkeeping for adversarial training.
//!
//! Every batch appends one [`BatchLoss`]; closing an epoch appends the mean
//! of that epoch's batches as an [`EpochSummary`].

use serde::{Deserialize, Serialize};

/// Losses of one discriminator/generator step pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchLoss {
    /// 1-based epoch the batch belongs to.
    pub epoch: usize,
    /// Discriminator loss: real-vs-ones plus fake-vs-zeros.
    pub discriminator: f32,
    /// Generator loss: fakes scored against ones.
    pub generator: f32,
}

/// Mean losses over one epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Number of batches trained in the epoch.
    pub batches: usize,
    /// Mean discriminator loss.
    pub discriminator_loss: f32,
    /// Mean generator loss.
    pub generator_loss: f32,
}

/// Per-batch and per-epoch losses of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    /// Every batch in training order.
    pub batches: Vec<BatchLoss>,
    /// One summary per completed epoch.
    pub epochs: Vec<EpochSummary>,
    #[serde(skip)]
    epoch_start: usize,
}

impl LossHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the losses of one batch.
    pub fn record_batch(&mut self, loss: BatchLoss) {
        self.batches.push(loss);
    }

    /// Number of batches recorded since the last closed epoch.
    pub fn open_batches(&self) -> usize {
        self.batches.len() - self.epoch_start
    }

    /// Averages the batches recorded since the previous call into a summary
    /// for `epoch`. An epoch with no batches reports zero losses.
    pub fn close_epoch(&mut self, epoch: usize) -> EpochSummary {
        let open = &self.batches[self.epoch_start..];
        let count = open.len();
        let (d_sum, g_sum) = open.iter().fold((0f32, 0f32), |(d, g), loss| {
            (d + loss.discriminator, g + loss.generator)
        });
        let divisor = count.max(1) as f32;

        let summary = EpochSummary {
            epoch,
            batches: count,
            discriminator_loss: d_sum / divisor,
            generator_loss: g_sum / divisor,
        };
        self.epochs.push(summary);
        self.epoch_start = self.batches.len();
        summary
    }

    /// Returns the most recent epoch summary.
    pub fn last_epoch(&self) -> Option<&EpochSummary> {
        self.epochs.last()
    }
}
