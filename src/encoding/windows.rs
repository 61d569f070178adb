//! Sliding-window encoder for training data.
//!
//! Maps a token stream through a [`Vocabulary`] and cuts it into overlapping
//! windows of `sequence_length` indices, stride 1, normalized to `[-1, 1]`.

use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{GanError, Result};
use crate::types::{Token, Vocabulary};

/// Maps a vocabulary index into `[-1, 1)`.
///
/// `(index - vocab_size / 2) / (vocab_size / 2)`
pub fn normalize_index(index: usize, vocab_size: usize) -> f32 {
    let half = vocab_size as f32 / 2.0;
    (index as f32 - half) / half
}

/// Inverse of [`normalize_index`], without rounding.
pub fn denormalize_value(value: f32, vocab_size: usize) -> f32 {
    let half = vocab_size as f32 / 2.0;
    value * half + half
}

/// Maps every token to its vocabulary index.
pub fn encode_indices(tokens: &[Token], vocab: &Vocabulary) -> Result<Vec<usize>> {
    tokens
        .iter()
        .map(|token| {
            vocab
                .index_of(token)
                .ok_or_else(|| GanError::unknown_token(token.as_str()))
        })
        .collect()
}

/// Normalized training windows, one row per start offset.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    windows: Array2<f32>,
    vocab_size: usize,
}

impl TrainingSet {
    /// Returns the number of windows.
    pub fn len(&self) -> usize {
        self.windows.nrows()
    }

    /// Returns true if there are no windows.
    pub fn is_empty(&self) -> bool {
        self.windows.nrows() == 0
    }

    /// Returns the number of values per window.
    pub fn sequence_length(&self) -> usize {
        self.windows.ncols()
    }

    /// Returns the size of the vocabulary the windows were encoded with.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Returns one window.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn window(&self, index: usize) -> ArrayView1<'_, f32> {
        self.windows.row(index)
    }

    /// Returns the rows at the given indices as a new `[indices.len(), K]`
    /// matrix. Indices may repeat.
    pub fn select(&self, indices: &[usize]) -> Array2<f32> {
        self.windows.select(Axis(0), indices)
    }

    /// Returns the full window matrix.
    pub fn as_array(&self) -> &Array2<f32> {
        &self.windows
    }
}

/// Slides a window of `sequence_length` tokens across `tokens` with stride 1.
///
/// Produces `tokens.len() - sequence_length` windows; the last start offset
/// is `tokens.len() - sequence_length - 1`. Fails with `CorpusTooShort` when
/// no window fits.
pub fn encode_windows(
    tokens: &[Token],
    vocab: &Vocabulary,
    sequence_length: usize,
) -> Result<TrainingSet> {
    if sequence_length == 0 {
        return Err(GanError::invalid_config("sequence_length must be > 0"));
    }

    if tokens.len() <= sequence_length {
        return Err(GanError::corpus_too_short(tokens.len(), sequence_length));
    }

    let indices = encode_indices(tokens, vocab)?;
    let vocab_size = vocab.len();
    let count = tokens.len() - sequence_length;

    let windows = Array2::from_shape_fn((count, sequence_length), |(start, i)| {
        normalize_index(indices[start + i], vocab_size)
    });

    Ok(TrainingSet {
        windows,
        vocab_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn corpus(len: usize, names: &[&str]) -> Vec<Token> {
        (0..len).map(|i| Token::from(names[i % names.len()])).collect()
    }

    #[test]
    fn window_count() {
        let tokens = corpus(150, &["C4", "E4", "G4", "0.4.7"]);
        let vocab = Vocabulary::build(&tokens);
        let set = encode_windows(&tokens, &vocab, 100).unwrap();
        assert_eq!(set.len(), 50);
        assert_eq!(set.sequence_length(), 100);
        assert_eq!(set.vocab_size(), 4);
    }

    #[test]
    fn too_short_corpus_fails() {
        for len in [0, 50, 100] {
            let tokens = corpus(len, &["C4", "D4"]);
            let vocab = Vocabulary::build(&tokens);
            let err = encode_windows(&tokens, &vocab, 100).unwrap_err();
            assert_eq!(err.code, ErrorCode::CorpusTooShort);
        }

        let tokens = corpus(101, &["C4", "D4"]);
        let vocab = Vocabulary::build(&tokens);
        assert_eq!(encode_windows(&tokens, &vocab, 100).unwrap().len(), 1);
    }

    #[test]
    fn windows_follow_the_stream() {
        let tokens = corpus(6, &["A4", "B4", "C4"]);
        let vocab = Vocabulary::build(&tokens);
        let set = encode_windows(&tokens, &vocab, 3).unwrap();
        assert_eq!(set.len(), 3);

        // A4=0, B4=1, C4=2; half = 1.5
        let expected = [-1.0, -1.0 / 3.0, 1.0 / 3.0];
        for (value, want) in set.window(0).iter().zip(expected) {
            assert!((value - want).abs() < 1e-6);
        }
        // Second window starts one token later.
        assert!((set.window(1)[0] - expected[1]).abs() < 1e-6);
    }

    #[test]
    fn values_within_bounds() {
        let alphabets: [&[&str]; 3] = [
            &["C4"],
            &["C4", "D4"],
            &["C4", "D4", "E4", "F4", "G4", "A4", "B4"],
        ];
        for names in alphabets {
            let tokens = corpus(40, names);
            let vocab = Vocabulary::build(&tokens);
            let set = encode_windows(&tokens, &vocab, 8).unwrap();
            assert!(set.as_array().iter().all(|v| (-1.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn foreign_vocabulary_is_rejected() {
        let tokens = corpus(20, &["C4", "D4"]);
        let vocab = Vocabulary::build(&corpus(20, &["C4"]));
        let err = encode_windows(&tokens, &vocab, 4).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownToken);
    }

    #[test]
    fn select_allows_repeats() {
        let tokens = corpus(12, &["C4", "D4", "E4"]);
        let vocab = Vocabulary::build(&tokens);
        let set = encode_windows(&tokens, &vocab, 4).unwrap();
        let batch = set.select(&[2, 2, 0]);
        assert_eq!(batch.dim(), (3, 4));
        assert_eq!(batch.row(0), batch.row(1));
        assert_eq!(batch.row(2), set.window(0));
    }

    #[test]
    fn normalization_inverts() {
        for vocab_size in [1, 2, 3, 190] {
            for index in 0..vocab_size {
                let value = normalize_index(index, vocab_size);
                let back = denormalize_value(value, vocab_size).round() as usize;
                assert_eq!(back, index);
            }
        }
    }
}
