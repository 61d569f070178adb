//! Adversarial training module.
//!
//! - [`AdversarialTrainer`](trainer::AdversarialTrainer): Alternating discriminator/generator updates
//! - [`LossHistory`](history::LossHistory): Per-batch and per-epoch losses

pub mod history;
pub mod trainer;

// Re-export commonly used items
pub use history::{BatchLoss, EpochSummary, LossHistory};
pub use trainer::{sample_latent, AdversarialTrainer};
