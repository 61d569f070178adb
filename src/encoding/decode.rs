//! Decoding of generated sequences back into tokens.
//!
//! Applies the inverse of the window normalization, rounds to the nearest
//! index and clamps into the vocabulary.

use tracing::warn;

use crate::error::{GanError, Result};
use crate::types::{Token, Vocabulary};

use super::windows::denormalize_value;

/// Indices recovered from a generated sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIndices {
    /// One vocabulary index per input value.
    pub indices: Vec<usize>,
    /// How many values fell outside the vocabulary and were clamped.
    pub clamped: usize,
}

/// Maps generated values to vocabulary indices.
///
/// Values outside the vocabulary after rounding are clamped to the nearest
/// valid index and counted. NaN or infinite values are an error.
pub fn decode_indices(values: &[f32], vocab_size: usize) -> Result<DecodedIndices> {
    if vocab_size == 0 {
        return Err(GanError::empty_corpus());
    }

    let max_index = (vocab_size - 1) as f32;
    let mut clamped = 0;
    let mut indices = Vec::with_capacity(values.len());

    for (position, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(GanError::non_finite(
                "generator",
                format!("decoding position {}", position),
            ));
        }

        let raw = denormalize_value(value, vocab_size).round();
        if raw < 0.0 || raw > max_index {
            clamped += 1;
        }
        indices.push(raw.clamp(0.0, max_index) as usize);
    }

    Ok(DecodedIndices { indices, clamped })
}

/// Decodes a generated sequence into tokens through `vocab`.
///
/// Emits one warning per call if any value had to be clamped.
pub fn decode_sequence(values: &[f32], vocab: &Vocabulary) -> Result<Vec<Token>> {
    let decoded = decode_indices(values, vocab.len())?;

    if decoded.clamped > 0 {
        warn!(
            clamped = decoded.clamped,
            total = values.len(),
            vocab_size = vocab.len(),
            "generated values outside the vocabulary were clamped"
        );
    }

    decoded
        .indices
        .iter()
        .map(|&i| {
            vocab
                .token_at(i)
                .cloned()
                .ok_or_else(|| GanError::model_failed(format!("index {} out of range", i)))
        })
        .collect()
}
