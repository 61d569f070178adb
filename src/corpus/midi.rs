//! MIDI file reader.
//!
//! Parses a Standard MIDI File into a [`ParsedScore`]: one part per
//! (track, channel) pair that contains notes, with notes sharing an onset
//! tick grouped into one element. Only metrical (ticks per quarter) timing
//! is supported.

use std::collections::BTreeMap;
use std::path::Path;

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{GanError, Result};
use crate::types::{Element, ParsedScore, Part};

/// Reads and parses a MIDI file.
pub fn read_midi(path: &Path) -> Result<ParsedScore> {
    let bytes = std::fs::read(path)
        .map_err(|e| GanError::score_parse_failed(path.display().to_string(), e.to_string()))?;
    parse_midi(&bytes)
        .map_err(|reason| GanError::score_parse_failed(path.display().to_string(), reason))
}

/// Notes and first program change of one channel within a track.
#[derive(Default)]
struct Voice {
    program: Option<u8>,
    onsets: BTreeMap<u64, Vec<u8>>,
}

impl Voice {
    /// Returns None if the channel played no notes.
    fn into_part(self, name: Option<String>, ticks_per_quarter: f64) -> Option<Part> {
        if self.onsets.is_empty() {
            return None;
        }

        let elements = self
            .onsets
            .into_iter()
            .map(|(tick, mut pitches)| {
                pitches.sort_unstable();
                pitches.dedup();
                Element {
                    offset: tick as f64 / ticks_per_quarter,
                    pitches,
                }
            })
            .collect();

        Some(Part {
            name,
            program: self.program,
            elements,
        })
    }
}

/// Parses MIDI bytes into a score.
pub fn parse_midi(bytes: &[u8]) -> std::result::Result<ParsedScore, String> {
    let smf = Smf::parse(bytes).map_err(|e| e.to_string())?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(tpq) if tpq.as_int() > 0 => tpq.as_int() as f64,
        Timing::Metrical(_) => return Err("zero ticks per quarter note".to_string()),
        Timing::Timecode(..) => return Err("timecode timing is not supported".to_string()),
    };

    let mut parts = Vec::new();
    for track in &smf.tracks {
        let mut tick: u64 = 0;
        let mut name = None;
        let mut voices: BTreeMap<u8, Voice> = BTreeMap::new();

        for event in track {
            tick += event.delta.as_int() as u64;
            match event.kind {
                TrackEventKind::Midi { channel, message } => {
                    let voice = voices.entry(channel.as_int()).or_default();
                    match message {
                        MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                            voice.onsets.entry(tick).or_default().push(key.as_int());
                        }
                        MidiMessage::ProgramChange { program } if voice.program.is_none() => {
                            voice.program = Some(program.as_int());
                        }
                        _ => {}
                    }
                }
                TrackEventKind::Meta(MetaMessage::TrackName(bytes)) if name.is_none() => {
                    name = Some(String::from_utf8_lossy(bytes).into_owned());
                }
                _ => {}
            }
        }

        for voice in voices.into_values() {
            if let Some(part) = voice.into_part(name.clone(), ticks_per_quarter) {
                parts.push(part);
            }
        }
    }

    Ok(ParsedScore { parts })
}
