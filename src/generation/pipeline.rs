//! Training and generation pipeline.
//!
//! Wires the corpus loader, sequence encoder, adversarial trainer, decoder
//! and MIDI writer into one run: score directory in, generated `.mid` file
//! and JSON training report out.

use std::path::{Path, PathBuf};

use candle_core::{Device, Module};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::cache::ParsedScoreCache;
use crate::config::TrainingConfig;
use crate::corpus::load_tokens;
use crate::encoding::{decode_sequence, encode_windows, TrainingSet};
use crate::error::{GanError, Result};
use crate::models::{AdversarialPair, Generator};
use crate::score::{render, write_midi};
use crate::training::{sample_latent, AdversarialTrainer, EpochSummary, LossHistory};
use crate::types::{Score, Token, Vocabulary};

/// Token stream, vocabulary and training windows of one corpus.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    /// Vocabulary built from the token stream.
    pub vocabulary: Vocabulary,
    /// Normalized stride-1 windows.
    pub training_set: TrainingSet,
    /// Number of tokens in the stream.
    pub token_count: usize,
}

/// Builds the vocabulary and training windows for a token stream.
pub fn prepare_corpus(tokens: &[Token], sequence_length: usize) -> Result<PreparedCorpus> {
    let vocabulary = Vocabulary::build(tokens);
    let training_set = encode_windows(tokens, &vocabulary, sequence_length)?;
    info!(
        tokens = tokens.len(),
        vocabulary = vocabulary.len(),
        windows = training_set.len(),
        "prepared training windows"
    );
    Ok(PreparedCorpus {
        vocabulary,
        training_set,
        token_count: tokens.len(),
    })
}

/// Runs the generator once on fresh noise and returns its raw output.
pub fn generate_sequence<R: Rng>(
    generator: &Generator,
    device: &Device,
    rng: &mut R,
) -> Result<Vec<f32>> {
    let latent = sample_latent(rng, 1, generator.sequence_length(), device)?;
    let values = generator.forward(&latent)?.flatten_all()?.to_vec1::<f32>()?;
    Ok(values)
}

/// Generates one sequence and decodes it into tokens.
pub fn generate_tokens<R: Rng>(
    generator: &Generator,
    vocab: &Vocabulary,
    device: &Device,
    rng: &mut R,
) -> Result<Vec<Token>> {
    let values = generate_sequence(generator, device, rng)?;
    decode_sequence(&values, vocab)
}

/// Generates one sequence, renders it and writes it to `path`.
pub fn write_sample<R: Rng>(
    generator: &Generator,
    vocab: &Vocabulary,
    device: &Device,
    rng: &mut R,
    path: &Path,
) -> Result<(Vec<Token>, Score)> {
    let tokens = generate_tokens(generator, vocab, device, rng)?;
    let score = render(&tokens)?;
    ensure_parent_dir(path)?;
    write_midi(&score, path)?;
    Ok((tokens, score))
}

/// Result of a completed training run.
pub struct TrainingOutcome {
    /// The trained generator.
    pub generator: Generator,
    /// Vocabulary the generator's output decodes against.
    pub vocabulary: Vocabulary,
    /// Tokens of the final generated sequence.
    pub tokens: Vec<Token>,
    /// Path of the final generated score.
    pub output_path: PathBuf,
    /// Paths of the intermediate samples, in epoch order.
    pub sample_paths: Vec<PathBuf>,
    /// Path of the written training report.
    pub report_path: PathBuf,
    /// Per-batch and per-epoch losses.
    pub history: LossHistory,
}

/// Training report written as JSON after a run.
#[derive(Debug, Serialize)]
pub struct TrainingReport<'a> {
    /// Crate version that produced the report.
    pub version: &'static str,
    /// Configuration of the run.
    pub config: &'a TrainingConfig,
    /// Tokens in the corpus.
    pub token_count: usize,
    /// Distinct tokens in the corpus.
    pub vocabulary_size: usize,
    /// Training windows.
    pub windows: usize,
    /// Batches trained per epoch.
    pub batches_per_epoch: usize,
    /// Final generated score.
    pub output_path: &'a Path,
    /// Intermediate samples.
    pub sample_paths: &'a [PathBuf],
    /// Loss history.
    pub history: &'a LossHistory,
}

/// Loads the corpus named by `config`, trains, and writes the outputs.
///
/// `on_epoch` receives each epoch's summary and the total epoch count.
pub fn run_training<F>(config: &TrainingConfig, on_epoch: F) -> Result<TrainingOutcome>
where
    F: FnMut(&EpochSummary, usize),
{
    if let Some(reason) = config.validate() {
        return Err(GanError::invalid_config(reason));
    }

    let cache = if config.use_cache {
        ParsedScoreCache::new()
    } else {
        ParsedScoreCache::disabled()
    };
    let tokens = load_tokens(&config.data_dir, config.max_files, &cache)?;
    let device = config.device.to_candle_device()?;

    train_on_tokens(config, &tokens, &device, on_epoch)
}

/// Trains on an already extracted token stream and writes the outputs.
///
/// Input errors (short corpus, bad batch size) are raised before the first
/// training step.
pub fn train_on_tokens<F>(
    config: &TrainingConfig,
    tokens: &[Token],
    device: &Device,
    mut on_epoch: F,
) -> Result<TrainingOutcome>
where
    F: FnMut(&EpochSummary, usize),
{
    if let Some(reason) = config.validate() {
        return Err(GanError::invalid_config(reason));
    }

    let corpus = prepare_corpus(tokens, config.model.sequence_length)?;
    let set = &corpus.training_set;
    let vocab = &corpus.vocabulary;

    let pair = AdversarialPair::new(&config.model, device)?;
    let mut trainer = AdversarialTrainer::new(pair, config.seed)?;

    let mut sample_paths = Vec::new();
    trainer.train(set, config.epochs, config.batch_size, |summary, trainer| {
        on_epoch(summary, config.epochs);

        if config.sample_due(summary.epoch) {
            let path = config.sample_path(summary.epoch);
            let generator = trainer.generator().clone();
            write_sample(&generator, vocab, device, trainer.rng_mut(), &path)?;
            info!(epoch = summary.epoch, path = %path.display(), "wrote sample");
            sample_paths.push(path);
        }
        Ok(())
    })?;

    let generator = trainer.generator().clone();
    let (tokens, _) = write_sample(
        &generator,
        vocab,
        device,
        trainer.rng_mut(),
        &config.output_path,
    )?;
    info!(path = %config.output_path.display(), "wrote generated score");

    let (_, history) = trainer.into_parts();
    let report = TrainingReport {
        version: env!("CARGO_PKG_VERSION"),
        config,
        token_count: corpus.token_count,
        vocabulary_size: vocab.len(),
        windows: set.len(),
        batches_per_epoch: set.len() / config.batch_size,
        output_path: &config.output_path,
        sample_paths: &sample_paths,
        history: &history,
    };
    let report_path = config.effective_report_path();
    write_report(&report, &report_path)?;

    Ok(TrainingOutcome {
        generator,
        vocabulary: corpus.vocabulary,
        tokens,
        output_path: config.output_path.clone(),
        sample_paths,
        report_path,
        history,
    })
}

/// Writes a training report as pretty-printed JSON.
pub fn write_report(report: &TrainingReport<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| GanError::output_write_failed(path.display().to_string(), e.to_string()))?;
    ensure_parent_dir(path)?;
    std::fs::write(path, json)
        .map_err(|e| GanError::output_write_failed(path.display().to_string(), e.to_string()))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| GanError::output_write_failed(parent.display().to_string(), e.to_string())),
        _ => Ok(()),
    }
}
