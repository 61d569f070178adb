//! Parsed score model read from MIDI files.
//!
//! This is the cacheable intermediate form between a score file and the
//! token stream: parts, each with an optional instrument and a list of
//! elements ordered by onset.

use serde::{Deserialize, Serialize};

/// One onset in a part: a single pitch or several sounding together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Onset in quarter notes from the start of the score.
    pub offset: f64,
    /// MIDI pitches starting at this onset, ascending.
    pub pitches: Vec<u8>,
}

impl Element {
    /// Returns true if more than one pitch starts at this onset.
    pub fn is_chord(&self) -> bool {
        self.pitches.len() > 1
    }
}

/// One track of a score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Track name, if the file carries one.
    pub name: Option<String>,
    /// General MIDI program from the first Program Change, if any.
    pub program: Option<u8>,
    /// Elements ordered by offset.
    pub elements: Vec<Element>,
}

/// A parsed score file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedScore {
    /// Parts in file order. Parts with no notes are omitted.
    pub parts: Vec<Part>,
}

impl ParsedScore {
    /// Returns the total number of elements across all parts.
    pub fn element_count(&self) -> usize {
        self.parts.iter().map(|p| p.elements.len()).sum()
    }
}
