//! Score output module.
//!
//! Renders decoded tokens into a timed [`Score`](crate::types::Score) and
//! writes it as a MIDI file.

pub mod midi;
pub mod render;

// Re-export commonly used items
pub use midi::{offset_to_ticks, write_midi, write_midi_to_buffer, TICKS_PER_QUARTER};
pub use render::{render, render_token, OFFSET_STEP};
