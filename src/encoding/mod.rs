//! Sequence encoding and decoding.
//!
//! Converts between token streams and the normalized numeric windows the
//! networks consume and produce.

pub mod decode;
pub mod windows;

// Re-export commonly used items
pub use decode::{decode_indices, decode_sequence, DecodedIndices};
pub use windows::{
    denormalize_value, encode_indices, encode_windows, normalize_index, TrainingSet,
};
