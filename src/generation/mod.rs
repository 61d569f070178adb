//! Sequence generation module.
//!
//! Provides the end-to-end training and generation pipeline.

pub mod pipeline;

// Re-export commonly used items
pub use pipeline::{
    generate_sequence, generate_tokens, prepare_corpus, run_training, train_on_tokens,
    write_report, write_sample, PreparedCorpus, TrainingOutcome, TrainingReport,
};
