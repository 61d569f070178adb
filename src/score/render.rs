//! Token to score rendering.
//!
//! Chord tokens become chords of pitch classes placed in the default octave,
//! everything else is parsed as a pitch name. Each event starts
//! [`OFFSET_STEP`] quarter notes after the previous one.

use crate::error::{GanError, Result};
use crate::types::{
    parse_pitch_name, EventKind, Score, ScoreEvent, Token, CHORD_DELIMITER, DEFAULT_OCTAVE,
};

/// Quarter notes between consecutive events.
pub const OFFSET_STEP: f64 = 0.5;

/// MIDI pitch of pitch class 0 in the default octave.
const CHORD_BASE_PITCH: u8 = ((DEFAULT_OCTAVE + 1) * 12) as u8;

/// Builds the event for one token at `offset`.
pub fn render_token(token: &Token, offset: f64) -> Result<ScoreEvent> {
    let kind = if token.is_chord() {
        let pitches = token
            .as_str()
            .split(CHORD_DELIMITER)
            .map(|part| {
                part.parse::<u8>()
                    .ok()
                    .filter(|pc| *pc < 12)
                    .map(|pc| CHORD_BASE_PITCH + pc)
                    .ok_or_else(|| {
                        GanError::invalid_token(
                            token.as_str(),
                            format!("'{}' is not a pitch class", part),
                        )
                    })
            })
            .collect::<Result<Vec<u8>>>()?;
        EventKind::Chord(pitches)
    } else {
        let pitch = parse_pitch_name(token.as_str())
            .ok_or_else(|| GanError::invalid_token(token.as_str(), "not a pitch name"))?;
        EventKind::Note(pitch)
    };

    Ok(ScoreEvent { offset, kind })
}

/// Renders tokens into a score with offsets `0, 0.5, 1.0, ...`.
pub fn render(tokens: &[Token]) -> Result<Score> {
    let events = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| render_token(token, i as f64 * OFFSET_STEP))
        .collect::<Result<Vec<_>>>()?;

    Score::new(events).ok_or_else(|| GanError::model_failed("rendered offsets out of order"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn tokens(values: &[&str]) -> Vec<Token> {
        values.iter().map(|v| Token::from(*v)).collect()
    }

    #[test]
    fn offsets_step_by_half_a_quarter() {
        let score = render(&tokens(&["C4", "4.7.11", "E-4", "0", "G#3"])).unwrap();
        assert_eq!(score.len(), 5);
        let offsets: Vec<f64> = score.events().iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(offsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn chord_token_renders_three_pitch_classes() {
        let event = render_token(&Token::from("4.7.11"), 0.0).unwrap();
        assert!(event.is_chord());
        assert_eq!(event.pitches(), &[64, 67, 71]);
    }

    #[test]
    fn numeric_token_renders_single_note_chord() {
        let event = render_token(&Token::from("7"), 0.0).unwrap();
        assert_eq!(event.kind, EventKind::Chord(vec![67]));
    }

    #[test]
    fn note_token_renders_one_pitch() {
        let event = render_token(&Token::from("C4"), 1.5).unwrap();
        assert_eq!(event.kind, EventKind::Note(60));
        assert_eq!(event.offset, 1.5);
    }

    #[test]
    fn malformed_tokens_fail() {
        for bad in ["4.x.11", "4.12", "X4", "C4.5"] {
            let err = render_token(&Token::from(bad), 0.0).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidToken, "{}", bad);
        }
    }

    #[test]
    fn empty_token_list_renders_empty_score() {
        assert!(render(&[]).unwrap().is_empty());
    }
}
