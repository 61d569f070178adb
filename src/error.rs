//! Error types for notegan.
//!
//! Defines all error codes and types used throughout the crate for
//! consistent error handling and reporting.

use std::fmt;

/// Error codes attached to every [`GanError`].
///
/// These codes let callers distinguish input problems, which are raised
/// before training starts, from failures inside a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No score files found in the data directory.
    /// Trigger: Directory missing, empty, or without .mid/.midi files.
    NoScoreFiles,

    /// A score file could not be parsed.
    /// Trigger: Corrupt MIDI, timecode timing, unreadable file.
    ScoreParseFailed,

    /// The parsed corpus contains no notes or chords.
    /// Trigger: Score files with no NoteOn events.
    EmptyCorpus,

    /// The token stream is too short to form a single training window.
    /// Trigger: Fewer than sequence_length + 1 tokens.
    CorpusTooShort,

    /// A token is missing from the vocabulary it is encoded with.
    /// Trigger: Encoding with a vocabulary built from another corpus.
    UnknownToken,

    /// A token cannot be rendered as a note or chord.
    /// Trigger: Malformed pitch name or chord pitch class.
    InvalidToken,

    /// Configuration values are out of range.
    /// Trigger: Zero epochs, batch size larger than the dataset, etc.
    InvalidConfig,

    /// A tensor operation failed.
    /// Trigger: Shape mismatch, device error, OOM.
    ModelFailed,

    /// A loss, gradient or generated value is NaN or infinite.
    /// Trigger: Numerical instability during training or generation.
    NonFiniteValue,

    /// Reading or writing a parsed-score cache file failed.
    /// Trigger: Permission denied, disk full.
    CacheFailed,

    /// Writing a score or report file failed.
    /// Trigger: Missing output directory, permission denied, disk full.
    OutputWriteFailed,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoScoreFiles => "NO_SCORE_FILES",
            ErrorCode::ScoreParseFailed => "SCORE_PARSE_FAILED",
            ErrorCode::EmptyCorpus => "EMPTY_CORPUS",
            ErrorCode::CorpusTooShort => "CORPUS_TOO_SHORT",
            ErrorCode::UnknownToken => "UNKNOWN_TOKEN",
            ErrorCode::InvalidToken => "INVALID_TOKEN",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::ModelFailed => "MODEL_FAILED",
            ErrorCode::NonFiniteValue => "NON_FINITE_VALUE",
            ErrorCode::CacheFailed => "CACHE_FAILED",
            ErrorCode::OutputWriteFailed => "OUTPUT_WRITE_FAILED",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::NoScoreFiles => "No score files found in the data directory",
            ErrorCode::ScoreParseFailed => "A score file could not be parsed",
            ErrorCode::EmptyCorpus => "The corpus contains no notes or chords",
            ErrorCode::CorpusTooShort => "The corpus is too short for one training window",
            ErrorCode::UnknownToken => "A token is not part of the vocabulary",
            ErrorCode::InvalidToken => "A token cannot be rendered as a note or chord",
            ErrorCode::InvalidConfig => "Configuration values are out of range",
            ErrorCode::ModelFailed => "A tensor operation failed",
            ErrorCode::NonFiniteValue => "A NaN or infinite value was produced",
            ErrorCode::CacheFailed => "Reading or writing a parsed-score cache failed",
            ErrorCode::OutputWriteFailed => "Writing an output file failed",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::NoScoreFiles => {
                "Point --data-dir (or NOTEGAN_DATA_DIR) at a directory containing .mid or .midi files"
            }
            ErrorCode::ScoreParseFailed => {
                "Remove or replace the offending file; only metrical-timed Standard MIDI Files are supported"
            }
            ErrorCode::EmptyCorpus => "Add score files that contain notes",
            ErrorCode::CorpusTooShort => {
                "Add more score files, raise --max-files, or lower the sequence length"
            }
            ErrorCode::UnknownToken => {
                "Encode and decode with the vocabulary built from the same corpus"
            }
            ErrorCode::InvalidToken => {
                "Tokens must be pitch names like C4, F#3, B-2 or dot-joined pitch classes like 4.7.11"
            }
            ErrorCode::InvalidConfig => {
                "Check epochs, batch size and sample interval; batch size must not exceed the number of windows"
            }
            ErrorCode::ModelFailed => {
                "Try --device cpu, or reduce the batch size if memory is exhausted"
            }
            ErrorCode::NonFiniteValue => {
                "Training diverged; rerun with a different seed or a smaller batch size"
            }
            ErrorCode::CacheFailed => {
                "Check write permissions in the data directory, or disable caching with --no-cache"
            }
            ErrorCode::OutputWriteFailed => {
                "Check that the output directory exists and is writable"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for notegan operations.
#[derive(Debug)]
pub struct GanError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GanError {
    /// Creates a new GanError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new GanError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a NO_SCORE_FILES error.
    pub fn no_score_files(dir: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NoScoreFiles,
            format!("No .mid or .midi files found in: {}", dir.into()),
        )
    }

    /// Creates a SCORE_PARSE_FAILED error.
    pub fn score_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ScoreParseFailed,
            format!("Failed to parse {}: {}", path.into(), reason.into()),
        )
    }

    /// Creates an EMPTY_CORPUS error.
    pub fn empty_corpus() -> Self {
        Self::new(ErrorCode::EmptyCorpus, "No notes or chords found in the corpus")
    }

    /// Creates a CORPUS_TOO_SHORT error.
    pub fn corpus_too_short(tokens: usize, sequence_length: usize) -> Self {
        Self::new(
            ErrorCode::CorpusTooShort,
            format!(
                "Corpus has {} tokens, need at least {} for sequence length {}",
                tokens,
                sequence_length + 1,
                sequence_length
            ),
        )
    }

    /// Creates an UNKNOWN_TOKEN error.
    pub fn unknown_token(token: &str) -> Self {
        Self::new(
            ErrorCode::UnknownToken,
            format!("Token '{}' is not in the vocabulary", token),
        )
    }

    /// Creates an INVALID_TOKEN error.
    pub fn invalid_token(token: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidToken,
            format!("Cannot render token '{}': {}", token, reason.into()),
        )
    }

    /// Creates an INVALID_CONFIG error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfig,
            format!("Invalid configuration: {}", reason.into()),
        )
    }

    /// Creates a MODEL_FAILED error.
    pub fn model_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ModelFailed,
            format!("Tensor operation failed: {}", reason.into()),
        )
    }

    /// Creates a NON_FINITE_VALUE error naming where the value appeared.
    pub fn non_finite(network: &str, step: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NonFiniteValue,
            format!("Non-finite value in {} during {}", network, step.into()),
        )
    }

    /// Creates a CACHE_FAILED error.
    pub fn cache_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::CacheFailed,
            format!("Cache file {}: {}", path.into(), reason.into()),
        )
    }

    /// Creates an OUTPUT_WRITE_FAILED error.
    pub fn output_write_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::OutputWriteFailed,
            format!("Failed to write {}: {}", path.into(), reason.into()),
        )
    }
}

impl fmt::Display for GanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for GanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<candle_core::Error> for GanError {
    fn from(err: candle_core::Error) -> Self {
        let message = format!("Tensor operation failed: {}", err);
        Self::with_source(ErrorCode::ModelFailed, message, err)
    }
}

/// Result type alias using GanError.
pub type Result<T> = std::result::Result<T, GanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::NoScoreFiles.as_str(), "NO_SCORE_FILES");
        assert_eq!(ErrorCode::CorpusTooShort.as_str(), "CORPUS_TOO_SHORT");
        assert_eq!(ErrorCode::NonFiniteValue.as_str(), "NON_FINITE_VALUE");
        assert_eq!(ErrorCode::InvalidConfig.as_str(), "INVALID_CONFIG");
    }

    #[test]
    fn error_code_recovery_hints_not_empty() {
        let codes = [
            ErrorCode::NoScoreFiles,
            ErrorCode::ScoreParseFailed,
            ErrorCode::EmptyCorpus,
            ErrorCode::CorpusTooShort,
            ErrorCode::UnknownToken,
            ErrorCode::InvalidToken,
            ErrorCode::InvalidConfig,
            ErrorCode::ModelFailed,
            ErrorCode::NonFiniteValue,
            ErrorCode::CacheFailed,
            ErrorCode::OutputWriteFailed,
        ];
        for code in codes {
            assert!(!code.recovery_hint().is_empty(), "{}", code);
            assert!(!code.description().is_empty(), "{}", code);
        }
    }

    #[test]
    fn gan_error_display() {
        let err = GanError::corpus_too_short(50, 100);
        let text = err.to_string();
        assert!(text.contains("CORPUS_TOO_SHORT"));
        assert!(text.contains("101"));
        assert!(text.contains("Recovery:"));
    }

    #[test]
    fn non_finite_names_network() {
        let err = GanError::non_finite("discriminator", "epoch 3, batch 7");
        assert_eq!(err.code, ErrorCode::NonFiniteValue);
        assert!(err.message.contains("discriminator"));
        assert!(err.message.contains("batch 7"));
    }

    #[test]
    fn candle_error_maps_to_model_failed() {
        let err: GanError = candle_core::Error::Msg("shape".to_string()).into();
        assert_eq!(err.code, ErrorCode::ModelFailed);
        assert!(std::error::Error::source(&err).is_some());
    }
}
