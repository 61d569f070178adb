//! notegan: adversarial note-sequence generation from MIDI scores.
//!
//! This library trains a generator and a discriminator on fixed-length
//! windows of note and chord tokens extracted from MIDI files, then renders
//! generated sequences back to MIDI.
//!
//! # Modules
//!
//! - [`types`]: Core data types (Token, Vocabulary, Score, ModelConfig)
//! - [`corpus`]: MIDI reading and token extraction
//! - [`cache`]: Parsed-score sidecar cache
//! - [`encoding`]: Window encoding and sequence decoding
//! - [`models`]: Generator and discriminator networks
//! - [`training`]: Adversarial trainer and loss history
//! - [`score`]: Token rendering and MIDI writing
//! - [`generation`]: End-to-end pipeline
//! - [`config`]: Runtime configuration (TrainingConfig, Device)
//! - [`error`]: Error types and codes (GanError, ErrorCode)
//!
//! # Example
//!
//! ```rust,ignore
//! use notegan::config::{Device, TrainingConfig};
//! use notegan::generation::run_training;
//!
//! let config = TrainingConfig {
//!     data_dir: "midi_songs".into(),
//!     output_path: "gan_final.mid".into(),
//!     device: Device::Cpu,
//!     epochs: 10,
//!     ..Default::default()
//! };
//!
//! let outcome = run_training(&config, |summary, total| {
//!     println!("epoch {}/{}: {:?}", summary.epoch, total, summary);
//! })?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod encoding;
pub mod error;
pub mod generation;
pub mod models;
pub mod score;
pub mod training;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use config::{Device, TrainingConfig};
pub use error::{ErrorCode, GanError, Result};
pub use types::{ModelConfig, Score, Token, Vocabulary};
