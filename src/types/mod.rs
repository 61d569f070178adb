//! Core types for notegan.
//!
//! This module re-exports all the core data types used throughout the crate:
//! - [`Token`]: String form of a note or chord
//! - [`Vocabulary`]: Token to index mapping for one corpus
//! - [`ParsedScore`]: Cacheable parse result of a MIDI file
//! - [`Score`]: Timed notes and chords ready to write out
//! - [`ModelConfig`]: Layer sizes for the generator and discriminator

mod config;
mod parsed;
mod score;
mod token;
mod vocabulary;

// Re-export all types at the module level
pub use config::{ModelConfig, DEFAULT_SEQUENCE_LENGTH};
pub use parsed::{Element, ParsedScore, Part};
pub use score::{EventKind, Score, ScoreEvent};
pub use token::{
    normal_order, parse_pitch_name, pitch_name, Token, CHORD_DELIMITER, DEFAULT_OCTAVE,
};
pub use vocabulary::Vocabulary;
