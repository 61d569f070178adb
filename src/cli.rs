//! CLI argument parser.
//!
//! Every option overrides the matching `NOTEGAN_*` environment variable;
//! unset options keep the environment or default value.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Device, TrainingConfig};

/// Available execution devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    /// Metal or CUDA when available, otherwise CPU
    #[default]
    Auto,
    /// CPU only
    Cpu,
    /// NVIDIA GPU via CUDA
    Cuda,
    /// Apple Silicon GPU via Metal
    Metal,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => Device::Auto,
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Cuda => Device::Cuda,
            DeviceArg::Metal => Device::Metal,
        }
    }
}

/// notegan: train a GAN on MIDI note sequences and write a generated score
#[derive(Parser, Debug)]
#[command(name = "notegan")]
#[command(about = "Train a GAN on a directory of MIDI files and generate a new score")]
#[command(version)]
pub struct Cli {
    /// Directory containing .mid/.midi files to learn from
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Output MIDI file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of training epochs
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub epochs: Option<u64>,

    /// Training windows per batch
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Write an intermediate sample every N epochs (0 disables)
    #[arg(long)]
    pub sample_interval: Option<usize>,

    /// Random seed for batch sampling and latent noise
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Read at most this many score files
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_files: Option<u64>,

    /// Execution device
    #[arg(long, value_enum)]
    pub device: Option<DeviceArg>,

    /// Skip reading and writing the parsed-score cache
    #[arg(long)]
    pub no_cache: bool,

    /// Training report path (defaults to training_report.json next to the output)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Applies the arguments on top of `base`.
    pub fn apply(&self, base: TrainingConfig) -> TrainingConfig {
        let mut config = base;

        if let Some(ref dir) = self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(ref output) = self.output {
            config.output_path = output.clone();
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs as usize;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size as usize;
        }
        if let Some(interval) = self.sample_interval {
            config.sample_interval = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(max) = self.max_files {
            config.max_files = Some(max as usize);
        }
        if let Some(device) = self.device {
            config.device = device.into();
        }
        if self.no_cache {
            config.use_cache = false;
        }
        if self.report.is_some() {
            config.report_path = self.report.clone();
        }

        config
    }

    /// Returns the run configuration: environment first, then arguments.
    pub fn training_config(&self) -> TrainingConfig {
        self.apply(TrainingConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "notegan",
            "--data-dir",
            "midi_songs",
            "--output",
            "gan_final.mid",
            "--epochs",
            "5",
            "--batch-size",
            "16",
            "--sample-interval",
            "2",
            "--seed",
            "7",
            "--max-files",
            "3",
            "--device",
            "cpu",
            "--no-cache",
            "--report",
            "report.json",
        ])
        .unwrap();

        let config = cli.apply(TrainingConfig::default());
        assert_eq!(config.data_dir, PathBuf::from("midi_songs"));
        assert_eq!(config.output_path, PathBuf::from("gan_final.mid"));
        assert_eq!(config.epochs, 5);
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.sample_interval, 2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_files, Some(3));
        assert_eq!(config.device, Device::Cpu);
        assert!(!config.use_cache);
        assert_eq!(config.report_path, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn unset_options_keep_base() {
        let cli = Cli::try_parse_from(["notegan"]).unwrap();
        let base = TrainingConfig {
            epochs: 9,
            seed: Some(1),
            ..TrainingConfig::default()
        };
        let config = cli.apply(base);
        assert_eq!(config.epochs, 9);
        assert_eq!(config.seed, Some(1));
        assert!(config.use_cache);
        assert_eq!(config.device, Device::Auto);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Cli::try_parse_from(["notegan", "--batch-size", "0"]).is_err());
        assert!(Cli::try_parse_from(["notegan", "--epochs", "0"]).is_err());
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["notegan", "-d", "songs", "-e", "2", "-b", "4", "-s", "3"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("songs")));
        assert_eq!(cli.epochs, Some(2));
        assert_eq!(cli.batch_size, Some(4));
        assert_eq!(cli.seed, Some(3));
    }
}
