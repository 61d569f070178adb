//! MIDI file writer for rendered scores.
//!
//! Writes a [`Score`] as a single-track Standard MIDI File using the midly
//! crate. Every event sounds for one quarter note on a piano.

use std::path::Path;

use midly::{
    num::{u15, u24, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

use crate::error::{GanError, Result};
use crate::types::Score;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Tempo of the output file in beats per minute.
pub const TEMPO_BPM: u32 = 120;

/// Length of every rendered note, in quarter notes.
pub const NOTE_LENGTH: f64 = 1.0;

/// Attack velocity of every rendered note.
const VELOCITY: u8 = 80;

/// General MIDI Acoustic Grand Piano.
const PIANO_PROGRAM: u8 = 0;

const CHANNEL: u8 = 0;

/// Writes a score to a MIDI file.
///
/// # Example
///
/// ```ignore
/// use notegan::score::{render, write_midi};
///
/// let score = render(&tokens)?;
/// write_midi(&score, Path::new("gan_final.mid"))?;
/// ```
pub fn write_midi(score: &Score, path: &Path) -> Result<()> {
    let buffer = write_midi_to_buffer(score)?;
    std::fs::write(path, &buffer).map_err(|e| {
        GanError::with_source(
            crate::error::ErrorCode::OutputWriteFailed,
            format!("Failed to write {}: {}", path.display(), e),
            e,
        )
    })
}

/// Writes a score to an in-memory MIDI buffer.
pub fn write_midi_to_buffer(score: &Score) -> Result<Vec<u8>> {
    let smf = score_to_smf(score);
    let mut buffer = Vec::new();
    smf.write(&mut buffer)
        .map_err(|e| GanError::output_write_failed("MIDI buffer", e.to_string()))?;
    Ok(buffer)
}

/// Converts a quarter-note offset to ticks.
pub fn offset_to_ticks(offset: f64) -> u32 {
    (offset * TICKS_PER_QUARTER as f64).round() as u32
}

/// Converts a score to an in-memory SMF.
fn score_to_smf(score: &Score) -> Smf<'static> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let channel = u4::new(CHANNEL);
    let mut track: Vec<TrackEvent<'static>> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(60_000_000 / TEMPO_BPM))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PIANO_PROGRAM),
                },
            },
        },
    ];

    // (tick, is_note_on, key). Offs sort before ons at the same tick so a
    // repeated pitch is released before it is struck again.
    let mut timeline: Vec<(u32, bool, u8)> = Vec::new();
    for event in score.events() {
        let start = offset_to_ticks(event.offset);
        let end = offset_to_ticks(event.offset + NOTE_LENGTH);
        for &pitch in event.pitches() {
            timeline.push((start, true, pitch));
            timeline.push((end, false, pitch));
        }
    }
    timeline.sort();

    let mut last_tick = 0;
    for (tick, is_on, key) in timeline {
        let message = if is_on {
            MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(VELOCITY),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(tick - last_tick),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    smf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::render;
    use crate::types::Token;
    use tempfile::tempdir;

    fn score(values: &[&str]) -> Score {
        let tokens: Vec<Token> = values.iter().map(|v| Token::from(*v)).collect();
        render(&tokens).unwrap()
    }

    fn note_ons(smf: &Smf) -> Vec<(u32, u8)> {
        let mut tick = 0;
        let mut ons = Vec::new();
        for event in &smf.tracks[0] {
            tick += event.delta.as_int();
            if let TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, vel },
                ..
            } = event.kind
            {
                if vel.as_int() > 0 {
                    ons.push((tick, key.as_int()));
                }
            }
        }
        ons
    }

    #[test]
    fn buffer_is_valid_smf() {
        let buffer = write_midi_to_buffer(&score(&["C4", "E4", "G4"])).unwrap();
        assert_eq!(&buffer[0..4], b"MThd");

        let smf = Smf::parse(&buffer).unwrap();
        assert_eq!(smf.header.format, Format::SingleTrack);
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(note_ons(&smf), vec![(0, 60), (240, 64), (480, 67)]);
    }

    #[test]
    fn chords_strike_together() {
        let buffer = write_midi_to_buffer(&score(&["4.7.11", "C4"])).unwrap();
        let smf = Smf::parse(&buffer).unwrap();
        assert_eq!(
            note_ons(&smf),
            vec![(0, 64), (0, 67), (0, 71), (240, 60)]
        );
    }

    #[test]
    fn repeated_pitch_is_released_first() {
        // C4 at 0 ends at 480, the third C4 starts at 480.
        let smf = score_to_smf(&score(&["C4", "D4", "C4"]));
        let mut tick = 0;
        let mut at_480 = Vec::new();
        for event in &smf.tracks[0] {
            tick += event.delta.as_int();
            if tick == 480 {
                if let TrackEventKind::Midi { message, .. } = event.kind {
                    at_480.push(matches!(message, MidiMessage::NoteOn { .. }));
                }
            }
        }
        assert_eq!(at_480, vec![false, true]);
    }

    #[test]
    fn write_midi_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.mid");
        write_midi(&score(&["C4"]), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_midi_to_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.mid");
        let err = write_midi(&score(&["C4"]), &path).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::OutputWriteFailed);
    }

    #[test]
    fn offset_conversion() {
        assert_eq!(offset_to_ticks(0.0), 0);
        assert_eq!(offset_to_ticks(0.5), 240);
        assert_eq!(offset_to_ticks(2.0), 960);
    }
}
