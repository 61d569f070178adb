//! Training run configuration module.
//!
//! Contains the runtime configuration for notegan, including execution
//! device selection, input and output paths, and training loop settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GanError, Result};
use crate::types::ModelConfig;

/// Default number of training epochs.
pub const DEFAULT_EPOCHS: usize = 100;

/// Default number of windows per batch.
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Default number of epochs between intermediate samples.
pub const DEFAULT_SAMPLE_INTERVAL: usize = 50;

/// File name of the training report written next to the output score.
pub const REPORT_FILE_NAME: &str = "training_report.json";

/// Execution device for tensor math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Use Metal or CUDA when available, otherwise the CPU.
    #[default]
    Auto,

    /// Force CPU execution.
    Cpu,

    /// Use CUDA for NVIDIA GPU acceleration.
    /// Requires building with the `cuda` feature.
    Cuda,

    /// Use Metal for Apple Silicon acceleration.
    /// Requires building with the `metal` feature.
    Metal,
}

impl Device {
    /// Returns the string representation of the device.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Auto => "auto",
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
            Device::Metal => "metal",
        }
    }

    /// Parses a device from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Device::Auto),
            "cpu" => Some(Device::Cpu),
            "cuda" | "gpu" => Some(Device::Cuda),
            "metal" | "mps" => Some(Device::Metal),
            _ => None,
        }
    }

    /// Resolves to a concrete candle device.
    ///
    /// Explicit GPU choices fail with `InvalidConfig` if the crate was built
    /// without the matching feature; `Auto` falls back to the CPU instead.
    pub fn to_candle_device(&self) -> Result<candle_core::Device> {
        let device = match self {
            Device::Cpu => candle_core::Device::Cpu,
            Device::Cuda if !cfg!(feature = "cuda") => {
                return Err(GanError::invalid_config(
                    "device 'cuda' needs a build with `--features cuda`",
                ));
            }
            Device::Metal if !cfg!(feature = "metal") => {
                return Err(GanError::invalid_config(
                    "device 'metal' needs a build with `--features metal`",
                ));
            }
            Device::Cuda => candle_core::Device::new_cuda(0)?,
            Device::Metal => candle_core::Device::new_metal(0)?,
            Device::Auto => {
                if candle_core::utils::metal_is_available() {
                    candle_core::Device::new_metal(0)?
                } else {
                    candle_core::Device::cuda_if_available(0)?
                }
            }
        };
        Ok(device)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration of one training run.
///
/// Typically loaded from environment variables and then overridden by
/// command-line arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Directory of `.mid`/`.midi` files to learn from.
    pub data_dir: PathBuf,

    /// Path of the final generated score.
    pub output_path: PathBuf,

    /// Path of the JSON training report.
    /// If None, `training_report.json` next to the output score.
    pub report_path: Option<PathBuf>,

    /// Execution device for training and generation.
    pub device: Device,

    /// Number of training epochs.
    pub epochs: usize,

    /// Windows per batch.
    pub batch_size: usize,

    /// Write an intermediate sample every this many epochs. 0 disables it.
    pub sample_interval: usize,

    /// Seed for batch sampling and latent noise.
    /// If None, seeded from system entropy.
    pub seed: Option<u64>,

    /// Read at most this many score files, in file name order.
    pub max_files: Option<usize>,

    /// Read and write the parsed-score cache next to each input file.
    pub use_cache: bool,

    /// Network layer sizes and learning rate.
    pub model: ModelConfig,
}

impl TrainingConfig {
    /// Creates a new TrainingConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a TrainingConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `NOTEGAN_DATA_DIR` - Directory of score files
    /// - `NOTEGAN_OUTPUT` - Path of the generated score
    /// - `NOTEGAN_DEVICE` - Device selection (auto, cpu, cuda, metal)
    /// - `NOTEGAN_EPOCHS` - Number of epochs
    /// - `NOTEGAN_BATCH_SIZE` - Windows per batch
    /// - `NOTEGAN_SAMPLE_INTERVAL` - Epochs between samples (0 disables)
    /// - `NOTEGAN_SEED` - Random seed
    /// - `NOTEGAN_MAX_FILES` - Maximum number of score files to read
    /// - `NOTEGAN_NO_CACHE` - Set to `1` or `true` to skip the parse cache
    ///
    /// Falls back to defaults for unset or unparsable variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("NOTEGAN_DATA_DIR") {
            config.data_dir = PathBuf::from(path);
        }

        if let Some(path) = lookup("NOTEGAN_OUTPUT") {
            config.output_path = PathBuf::from(path);
        }

        if let Some(device) = lookup("NOTEGAN_DEVICE").and_then(|s| Device::parse(&s)) {
            config.device = device;
        }

        if let Some(epochs) = lookup("NOTEGAN_EPOCHS").and_then(|s| s.parse().ok()) {
            config.epochs = epochs;
        }

        if let Some(batch_size) = lookup("NOTEGAN_BATCH_SIZE").and_then(|s| s.parse().ok()) {
            config.batch_size = batch_size;
        }

        if let Some(interval) = lookup("NOTEGAN_SAMPLE_INTERVAL").and_then(|s| s.parse().ok()) {
            config.sample_interval = interval;
        }

        if let Some(seed) = lookup("NOTEGAN_SEED").and_then(|s| s.parse().ok()) {
            config.seed = Some(seed);
        }

        if let Some(max) = lookup("NOTEGAN_MAX_FILES").and_then(|s| s.parse::<usize>().ok()) {
            if max > 0 {
                config.max_files = Some(max);
            }
        }

        if let Some(flag) = lookup("NOTEGAN_NO_CACHE") {
            if matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes") {
                config.use_cache = false;
            }
        }

        config
    }

    /// Returns the effective report path, next to the output if not specified.
    pub fn effective_report_path(&self) -> PathBuf {
        if let Some(ref path) = self.report_path {
            path.clone()
        } else {
            output_dir(&self.output_path).join(REPORT_FILE_NAME)
        }
    }

    /// Returns the path of the intermediate sample written after `epoch`:
    /// `<output_stem>_epoch_<epoch>.mid` next to the output.
    pub fn sample_path(&self, epoch: usize) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "generated".to_string());
        output_dir(&self.output_path).join(format!("{}_epoch_{}.mid", stem, epoch))
    }

    /// Returns true if an intermediate sample is due after `epoch`.
    pub fn sample_due(&self, epoch: usize) -> bool {
        self.sample_interval > 0 && epoch % self.sample_interval == 0
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        if self.epochs == 0 {
            return Some("epochs must be > 0".to_string());
        }

        if self.batch_size == 0 {
            return Some("batch_size must be > 0".to_string());
        }

        if self.max_files == Some(0) {
            return Some("max_files must be > 0".to_string());
        }

        if self.output_path.as_os_str().is_empty() {
            return Some("output path must not be empty".to_string());
        }

        self.model.validate()
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_path: PathBuf::from("generated.mid"),
            report_path: None,
            device: Device::Auto,
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            seed: None,
            max_files: None,
            use_cache: true,
            model: ModelConfig::default(),
        }
    }
}

fn output_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
