//! Corpus loading from a directory of score files.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache::{CacheOutcome, ParsedScoreCache};
use crate::error::{GanError, Result};
use crate::types::{ParsedScore, Token};

use super::extract::extract_tokens;

/// File extensions recognized as score files.
pub const SCORE_EXTENSIONS: &[&str] = &["mid", "midi"];

/// Lists score files in `dir`, sorted by file name.
///
/// Fails with `NoScoreFiles` if the directory is unreadable or holds none.
pub fn list_score_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        GanError::with_source(
            crate::error::ErrorCode::NoScoreFiles,
            format!("Cannot read data directory {}: {}", dir.display(), e),
            e,
        )
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_score_file(path))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(GanError::no_score_files(dir.display().to_string()));
    }

    Ok(files)
}

fn is_score_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCORE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Loads up to `max_files` parsed scores from `dir`.
pub fn load_corpus(
    dir: &Path,
    max_files: Option<usize>,
    cache: &ParsedScoreCache,
) -> Result<Vec<ParsedScore>> {
    let mut files = list_score_files(dir)?;
    if let Some(max) = max_files {
        files.truncate(max);
    }

    let mut scores = Vec::with_capacity(files.len());
    for path in &files {
        let (score, outcome) = cache.load(path)?;
        if outcome != CacheOutcome::Hit {
            debug!(path = %path.display(), "parsing score file");
        }
        scores.push(score);
    }

    Ok(scores)
}

/// Loads the token stream of every score in `dir`.
///
/// Fails with `EmptyCorpus` if the scores contain no notes.
pub fn load_tokens(
    dir: &Path,
    max_files: Option<usize>,
    cache: &ParsedScoreCache,
) -> Result<Vec<Token>> {
    let scores = load_corpus(dir, max_files, cache)?;
    let tokens = extract_tokens(&scores);

    if tokens.is_empty() {
        return Err(GanError::empty_corpus());
    }

    info!(files = scores.len(), tokens = tokens.len(), "loaded corpus");
    Ok(tokens)
}
