//! Cache module for parsed scores.
//!
//! Provides JSON sidecar caching so score files are parsed once.

pub mod parsed;

// Re-export commonly used types
pub use parsed::{cache_path_for, compute_source_digest, CacheOutcome, ParsedScoreCache};
