//! Token type for notes and chords.
//!
//! A token is the string form of one score event. Single notes use a pitch
//! name (`C4`, `F#3`, `B-2`); chords use the dot-joined pitch classes of
//! their normal order (`4.7.11`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between pitch classes in a chord token.
pub const CHORD_DELIMITER: char = '.';

/// Pitch class spellings, sharps for C#/F#/G# and flats for E-/B-.
const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "E-", "E", "F", "F#", "G", "G#", "A", "B-", "B",
];

/// Octave used when a pitch name or pitch class carries none.
pub const DEFAULT_OCTAVE: i32 = 4;

/// Marks octave -1 (MIDI 0-11), since `-` is the flat sign: `E_1` is MIDI 4,
/// `E-1` is MIDI 27.
pub const NEGATIVE_OCTAVE_SIGN: char = '_';

/// A single note or chord in string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Creates a token from its string form without validation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Creates a single-note token from a MIDI pitch.
    pub fn note(pitch: u8) -> Self {
        Self(pitch_name(pitch))
    }

    /// Creates a chord token from the MIDI pitches sounding together.
    pub fn chord(pitches: &[u8]) -> Self {
        let classes: Vec<u8> = pitches.iter().map(|p| p % 12).collect();
        let joined = normal_order(&classes)
            .iter()
            .map(|pc| pc.to_string())
            .collect::<Vec<_>>()
            .join(&CHORD_DELIMITER.to_string());
        Self(joined)
    }

    /// Returns the string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this token renders as a chord.
    ///
    /// Purely numeric tokens are single pitch-class chords.
    pub fn is_chord(&self) -> bool {
        self.0.contains(CHORD_DELIMITER)
            || (!self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_digit()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Returns the pitch name for a MIDI pitch, e.g. 60 -> "C4", 70 -> "B-4",
/// 3 -> "E-_1".
pub fn pitch_name(pitch: u8) -> String {
    let class = PITCH_CLASS_NAMES[(pitch % 12) as usize];
    match pitch / 12 {
        0 => format!("{}{}1", class, NEGATIVE_OCTAVE_SIGN),
        octave => format!("{}{}", class, octave - 1),
    }
}

/// Parses a pitch name such as `C4`, `F#3`, `B-2` or `e` into a MIDI pitch.
///
/// `#` raises and `-` lowers by a semitone and may repeat. A missing octave
/// defaults to [`DEFAULT_OCTAVE`]; octave -1 is written `_1`.
pub fn parse_pitch_name(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let step = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let accidentals = rest.len() - rest.trim_start_matches(['#', '-']).len();
    let (accidental_str, octave_str) = rest.split_at(accidentals);
    let alter: i32 = accidental_str
        .chars()
        .map(|c| if c == '#' { 1 } else { -1 })
        .sum();

    let octave = match octave_str.strip_prefix(NEGATIVE_OCTAVE_SIGN) {
        Some(digits) => -parse_octave_digits(digits)?,
        None if octave_str.is_empty() => DEFAULT_OCTAVE,
        None => parse_octave_digits(octave_str)?,
    };

    let midi = (octave + 1) * 12 + step + alter;
    u8::try_from(midi).ok().filter(|m| *m <= 127)
}

fn parse_octave_digits(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u8>().ok().map(i32::from)
}

/// Returns the normal order of a set of pitch classes.
///
/// Picks the rotation of the sorted unique classes with the smallest span.
/// Ties go to the rotation whose intervals from the first note are smallest,
/// compared from the second-to-last note downwards, then to the lowest
/// starting class.
pub fn normal_order(pitch_classes: &[u8]) -> Vec<u8> {
    let mut classes: Vec<u8> = pitch_classes.iter().map(|pc| pc % 12).collect();
    classes.sort_unstable();
    classes.dedup();

    let n = classes.len();
    if n <= 1 {
        return classes;
    }

    let rotations = (0..n).map(|start| {
        (0..n)
            .map(|i| classes[(start + i) % n])
            .collect::<Vec<u8>>()
    });

    rotations
        .min_by_key(|rotation| {
            let first = rotation[0];
            let interval = |pc: u8| (pc + 12 - first) % 12;
            let mut key = Vec::with_capacity(n + 1);
            key.push(interval(rotation[n - 1]));
            for i in (1..n - 1).rev() {
                key.push(interval(rotation[i]));
            }
            key.push(first);
            key
        })
        .unwrap_or_default()
}
