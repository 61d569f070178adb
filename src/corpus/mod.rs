//! Corpus module: score files to token stream.
//!
//! - [`midi`]: MIDI file reader producing [`ParsedScore`](crate::types::ParsedScore)
//! - [`extract`]: Token extraction with instrument partitioning
//! - [`loader`]: Directory listing and cached loading

pub mod extract;
pub mod loader;
pub mod midi;

// Re-export commonly used items
pub use extract::{extract_tokens, partition_by_instrument, score_elements, Walk};
pub use loader::{list_score_files, load_corpus, load_tokens, SCORE_EXTENSIONS};
pub use midi::{parse_midi, read_midi};
