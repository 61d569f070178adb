//! Token extraction from parsed scores.
//!
//! Walks each score in temporal order and turns every element into a
//! [`Token`]: a pitch name for single notes, the normal-order pitch classes
//! for chords.

use tracing::debug;

use crate::types::{Element, ParsedScore, Token};

/// Which walk produced a score's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// The first instrument's parts, merged.
    ByInstrument,
    /// Every part merged, used when no part names an instrument.
    Flat,
}

/// Reasons a score cannot be split by instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionError {
    /// No part carries a program change.
    NoInstruments,
}

/// Returns the elements of the first instrument in the score, ordered by
/// offset. All parts playing that instrument are merged.
pub fn partition_by_instrument(
    score: &ParsedScore,
) -> std::result::Result<Vec<&Element>, PartitionError> {
    let first_program = score
        .parts
        .iter()
        .find_map(|part| part.program)
        .ok_or(PartitionError::NoInstruments)?;

    let elements = score
        .parts
        .iter()
        .filter(|part| part.program == Some(first_program))
        .flat_map(|part| part.elements.iter());
    Ok(sorted_by_offset(elements))
}

/// Returns every element of the score ordered by offset.
pub fn flat_elements(score: &ParsedScore) -> Vec<&Element> {
    sorted_by_offset(score.parts.iter().flat_map(|part| part.elements.iter()))
}

fn sorted_by_offset<'a>(elements: impl Iterator<Item = &'a Element>) -> Vec<&'a Element> {
    let mut elements: Vec<&Element> = elements.collect();
    elements.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    elements
}

/// Returns the elements to tokenize, partitioned by instrument when possible.
pub fn score_elements(score: &ParsedScore) -> (Vec<&Element>, Walk) {
    match partition_by_instrument(score) {
        Ok(elements) => (elements, Walk::ByInstrument),
        Err(reason) => {
            debug!(?reason, "score has no instrument parts, walking flat");
            (flat_elements(score), Walk::Flat)
        }
    }
}

/// Returns the token for one element, or None if it holds no pitches.
pub fn element_token(element: &Element) -> Option<Token> {
    match element.pitches.as_slice() {
        [] => None,
        [pitch] => Some(Token::note(*pitch)),
        pitches => Some(Token::chord(pitches)),
    }
}

/// Flattens a collection of parsed scores into one ordered token stream.
pub fn extract_tokens(scores: &[ParsedScore]) -> Vec<Token> {
    scores
        .iter()
        .flat_map(|score| {
            let (elements, _) = score_elements(score);
            elements.into_iter().filter_map(element_token).collect::<Vec<_>>()
        })
        .collect()
}
