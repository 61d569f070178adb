//! Score type for rendered output.
//!
//! A Score is the ordered, timed sequence of notes and chords produced from
//! generated tokens. It is built once, written out, and discarded.

/// What sounds at one score position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A single MIDI pitch.
    Note(u8),
    /// Several MIDI pitches starting together.
    Chord(Vec<u8>),
}

/// One note or chord with its start offset in quarter notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEvent {
    /// Start offset in quarter notes.
    pub offset: f64,
    /// The note or chord.
    pub kind: EventKind,
}

impl ScoreEvent {
    /// Returns the MIDI pitches sounding in this event.
    pub fn pitches(&self) -> &[u8] {
        match &self.kind {
            EventKind::Note(pitch) => std::slice::from_ref(pitch),
            EventKind::Chord(pitches) => pitches,
        }
    }

    /// Returns true if this event is a chord.
    pub fn is_chord(&self) -> bool {
        matches!(self.kind, EventKind::Chord(_))
    }
}

/// An ordered sequence of events with non-decreasing offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    events: Vec<ScoreEvent>,
}

impl Score {
    /// Creates a score from events, which must already be ordered by offset.
    ///
    /// Returns None if any offset is lower than the one before it or is not
    /// finite.
    pub fn new(events: Vec<ScoreEvent>) -> Option<Self> {
        let ordered = events.iter().all(|e| e.offset.is_finite() && e.offset >= 0.0)
            && events.windows(2).all(|w| w[0].offset <= w[1].offset);
        ordered.then_some(Self { events })
    }

    /// Returns the events in order.
    pub fn events(&self) -> &[ScoreEvent] {
        &self.events
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the score has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the offset of the last event, or 0 for an empty score.
    pub fn last_offset(&self) -> f64 {
        self.events.last().map(|e| e.offset).unwrap_or(0.0)
    }
}
