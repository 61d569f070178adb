//! notegan: train a GAN on MIDI note sequences and write a generated score.
//!
//! Reads every `.mid`/`.midi` file in the data directory, trains the
//! generator and discriminator, then writes the generated score and a JSON
//! training report. Set `RUST_LOG` for per-batch detail.

use std::time::Instant;

use notegan::cli::Cli;
use notegan::config::TrainingConfig;
use notegan::error::Result;
use notegan::generation::run_training;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notegan=info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = cli.training_config();

    print_banner(&config);

    let start_time = Instant::now();
    let outcome = run_training(&config, |summary, total| {
        eprintln!(
            "Epoch {}/{}: d_loss={:.4} g_loss={:.4}",
            summary.epoch, total, summary.discriminator_loss, summary.generator_loss
        );
    })?;
    let elapsed = start_time.elapsed().as_secs_f32();

    eprintln!();
    eprintln!("Training complete!");
    eprintln!("  Time: {:.2}s", elapsed);
    eprintln!("  Batches: {}", outcome.history.batches.len());
    eprintln!("  Generated tokens: {}", outcome.tokens.len());
    for path in &outcome.sample_paths {
        eprintln!("  Sample: {}", path.display());
    }
    eprintln!("Saved to: {}", outcome.output_path.display());
    eprintln!("Report: {}", outcome.report_path.display());

    Ok(())
}

fn print_banner(config: &TrainingConfig) {
    eprintln!("=== notegan ===");
    eprintln!("Data directory: {}", config.data_dir.display());
    eprintln!("Output: {}", config.output_path.display());
    eprintln!("Device: {}", config.device);
    eprintln!("Epochs: {}", config.epochs);
    eprintln!("Batch size: {}", config.batch_size);
    eprintln!("Sequence length: {}", config.model.sequence_length);
    if config.sample_interval > 0 {
        eprintln!("Sample every: {} epochs", config.sample_interval);
    }
    if let Some(seed) = config.seed {
        eprintln!("Seed: {}", seed);
    }
    if let Some(max) = config.max_files {
        eprintln!("Max files: {}", max);
    }
    if !config.use_cache {
        eprintln!("Parse cache: disabled");
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_banner_doesnt_panic() {
        print_banner(&TrainingConfig::default());
    }
}
