//! GAN network components.
//!
//! - [`Generator`](generator::Generator): Latent vector to note sequence
//! - [`Discriminator`](discriminator::Discriminator): Real-versus-generated scorer
//! - [`AdversarialPair`](pair::AdversarialPair): Both networks and their parameters
//! - [`layers`]: LeakyReLU, stable BCE loss, gradient norms

pub mod discriminator;
pub mod generator;
pub mod layers;
pub mod pair;

// Re-export commonly used types
pub use discriminator::Discriminator;
pub use generator::Generator;
pub use layers::{binary_cross_entropy_with_logits, gradient_norm, leaky_relu};
pub use pair::AdversarialPair;
