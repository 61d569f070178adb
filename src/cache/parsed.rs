//! On-disk cache of parsed scores.
//!
//! Each score file gets a JSON sidecar with the same stem
//! (`song.mid` -> `song.parsed.json`) holding the parsed form and a digest
//! of the source bytes. A sidecar whose digest no longer matches is
//! replaced.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::corpus::midi::parse_midi;
use crate::error::{GanError, Result};
use crate::types::ParsedScore;

/// Extension of cache sidecar files.
pub const CACHE_EXTENSION: &str = "parsed.json";

/// Bumped whenever the parsed model changes shape or meaning.
const CACHE_FORMAT_VERSION: u32 = 2;

/// How a score was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Read from a valid sidecar.
    Hit,
    /// No sidecar existed; parsed and written.
    Miss,
    /// The sidecar was outdated or unreadable; parsed and rewritten.
    Stale,
    /// Caching is off; parsed without touching sidecars.
    Disabled,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    version: u32,
    source_digest: String,
    score: ParsedScore,
}

/// Returns the sidecar path for a score file.
pub fn cache_path_for(source: &Path) -> PathBuf {
    source.with_extension(CACHE_EXTENSION)
}

/// Computes the digest stored alongside a parsed score.
///
/// The digest is the first 16 hex characters of the SHA256 of the source
/// bytes.
pub fn compute_source_digest(bytes: &[u8]) -> String {
    let result = Sha256::digest(bytes);
    hex::encode(&result[..8])
}

/// Parsed-score loader backed by JSON sidecars.
#[derive(Debug, Clone, Copy)]
pub struct ParsedScoreCache {
    enabled: bool,
}

impl ParsedScoreCache {
    /// Creates a cache that reads and writes sidecars.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Creates a cache that always parses and never touches sidecars.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Returns true if sidecars are used.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Loads a score, preferring a valid sidecar over parsing.
    pub fn load(&self, source: &Path) -> Result<(ParsedScore, CacheOutcome)> {
        let bytes = std::fs::read(source).map_err(|e| {
            GanError::score_parse_failed(source.display().to_string(), e.to_string())
        })?;

        let parse = |bytes: &[u8]| {
            parse_midi(bytes).map_err(|reason| {
                GanError::score_parse_failed(source.display().to_string(), reason)
            })
        };

        if !self.enabled {
            return Ok((parse(&bytes)?, CacheOutcome::Disabled));
        }

        let digest = compute_source_digest(&bytes);
        let cache_path = cache_path_for(source);

        let outcome = match read_record(&cache_path) {
            Some(record) if record.version == CACHE_FORMAT_VERSION && record.source_digest == digest => {
                debug!(path = %cache_path.display(), "reading parsed file");
                return Ok((record.score, CacheOutcome::Hit));
            }
            Some(_) => CacheOutcome::Stale,
            None if cache_path.exists() => CacheOutcome::Stale,
            None => CacheOutcome::Miss,
        };

        let score = parse(&bytes)?;
        let record = CacheRecord {
            version: CACHE_FORMAT_VERSION,
            source_digest: digest,
            score,
        };
        write_record(&cache_path, &record)?;
        debug!(path = %cache_path.display(), ?outcome, "writing parsed file");

        Ok((record.score, outcome))
    }
}

impl Default for ParsedScoreCache {
    fn default() -> Self {
        Self::new()
    }
}

fn read_record(path: &Path) -> Option<CacheRecord> {
    let contents = std::fs::read(path).ok()?;
    match serde_json::from_slice(&contents) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unreadable cache file");
            None
        }
    }
}

fn write_record(path: &Path, record: &CacheRecord) -> Result<()> {
    let json = serde_json::to_vec(record)
        .map_err(|e| GanError::cache_failed(path.display().to_string(), e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| GanError::cache_failed(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{render, write_midi};
    use crate::types::Token;
    use tempfile::tempdir;

    fn write_score(path: &Path, tokens: &[&str]) {
        let tokens: Vec<Token> = tokens.iter().map(|t| Token::from(*t)).collect();
        write_midi(&render(&tokens).unwrap(), path).unwrap();
    }

    #[test]
    fn sidecar_path() {
        assert_eq!(
            cache_path_for(Path::new("/data/song.mid")),
            PathBuf::from("/data/song.parsed.json")
        );
        assert_eq!(
            cache_path_for(Path::new("/data/song.midi")),
            PathBuf::from("/data/song.parsed.json")
        );
    }

    #[test]
    fn digest_format() {
        let digest = compute_source_digest(b"MThd");
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, compute_source_digest(b"MThd"));
        assert_ne!(digest, compute_source_digest(b"MTrk"));
    }

    #[test]
    fn miss_then_hit() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.mid");
        write_score(&source, &["C4", "E4", "0.4.7"]);

        let cache = ParsedScoreCache::new();
        let (first, outcome) = cache.load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Miss);
        assert!(cache_path_for(&source).exists());

        let (second, outcome) = cache.load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Hit);
        assert_eq!(first, second);
    }

    #[test]
    fn changed_source_is_stale() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.mid");
        write_score(&source, &["C4"]);

        let cache = ParsedScoreCache::new();
        cache.load(&source).unwrap();

        write_score(&source, &["C4", "D4"]);
        let (score, outcome) = cache.load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Stale);
        assert_eq!(score.element_count(), 2);
    }

    #[test]
    fn corrupt_sidecar_is_replaced() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.mid");
        write_score(&source, &["C4"]);
        std::fs::write(cache_path_for(&source), b"{not json").unwrap();

        let (_, outcome) = ParsedScoreCache::new().load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Stale);
        let (_, outcome) = ParsedScoreCache::new().load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Hit);
    }

    #[test]
    fn disabled_cache_writes_nothing() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.mid");
        write_score(&source, &["C4"]);

        let (_, outcome) = ParsedScoreCache::disabled().load(&source).unwrap();
        assert_eq!(outcome, CacheOutcome::Disabled);
        assert!(!cache_path_for(&source).exists());
    }
}
