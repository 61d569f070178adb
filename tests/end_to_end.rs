//! End-to-end training runs on synthetic corpora.

use std::path::Path;

use candle_core::Device as CandleDevice;
use notegan::cache::cache_path_for;
use notegan::config::{Device, TrainingConfig};
use notegan::corpus::read_midi;
use notegan::encoding::decode_indices;
use notegan::error::ErrorCode;
use notegan::generation::{generate_sequence, run_training, train_on_tokens};
use notegan::score::{render, write_midi};
use notegan::types::{ModelConfig, Token};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

fn three_token_corpus(len: usize) -> Vec<Token> {
    let alphabet = ["C4", "G4", "0.4.7"];
    (0..len)
        .map(|i| Token::from(alphabet[(i * i + i / 2) % alphabet.len()]))
        .collect()
}

#[test]
fn trains_and_generates_from_three_token_vocabulary() {
    let dir = tempdir().unwrap();
    let config = TrainingConfig {
        output_path: dir.path().join("gan_final.mid"),
        device: Device::Cpu,
        epochs: 2,
        batch_size: 8,
        sample_interval: 0,
        seed: Some(42),
        model: ModelConfig::with_sequence_length(100),
        ..TrainingConfig::default()
    };

    let tokens = three_token_corpus(250);
    let outcome = train_on_tokens(&config, &tokens, &CandleDevice::Cpu, |_, _| {}).unwrap();
    assert_eq!(outcome.vocabulary.len(), 3);

    // 150 windows, 18 batches per epoch.
    assert_eq!(outcome.history.epochs.len(), 2);
    assert!(outcome.history.epochs.iter().all(|e| e.batches == 18));

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let values = generate_sequence(&outcome.generator, &CandleDevice::Cpu, &mut rng).unwrap();
    assert_eq!(values.len(), 100);
    let decoded = decode_indices(&values, outcome.vocabulary.len()).unwrap();
    assert!(decoded.indices.iter().all(|&i| i < 3));

    let written = std::fs::metadata(&outcome.output_path).unwrap();
    assert!(written.len() > 0);
    let reread = read_midi(&outcome.output_path).unwrap();
    assert!(reread.element_count() > 0);
    assert!(outcome.report_path.exists());
}

fn write_song(path: &Path, tokens: &[Token]) {
    write_midi(&render(tokens).unwrap(), path).unwrap();
}

#[test]
fn trains_from_a_directory_of_midi_files() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let tokens = three_token_corpus(40);
    write_song(&data.path().join("a.mid"), &tokens[..20]);
    write_song(&data.path().join("b.mid"), &tokens[20..]);

    let config = TrainingConfig {
        data_dir: data.path().to_path_buf(),
        output_path: out.path().join("song.mid"),
        device: Device::Cpu,
        epochs: 2,
        batch_size: 4,
        sample_interval: 2,
        seed: Some(3),
        model: ModelConfig {
            generator_hidden: 16,
            generator_wide: 32,
            discriminator_hidden: 16,
            discriminator_dense: 8,
            ..ModelConfig::with_sequence_length(10)
        },
        ..TrainingConfig::default()
    };

    let outcome = run_training(&config, |_, _| {}).unwrap();
    assert_eq!(outcome.vocabulary.len(), 3);
    assert_eq!(outcome.sample_paths, vec![out.path().join("song_epoch_2.mid")]);
    assert!(outcome.output_path.exists());
    assert!(cache_path_for(&data.path().join("a.mid")).exists());
    assert!(cache_path_for(&data.path().join("b.mid")).exists());

    // A second run reads the cache and sees the same corpus.
    let again = run_training(&config, |_, _| {}).unwrap();
    assert_eq!(again.vocabulary, outcome.vocabulary);
}

#[test]
fn empty_data_directory_is_reported() {
    let data = tempdir().unwrap();
    let config = TrainingConfig {
        data_dir: data.path().to_path_buf(),
        output_path: data.path().join("song.mid"),
        device: Device::Cpu,
        ..TrainingConfig::default()
    };
    let err = run_training(&config, |_, _| {}).err().unwrap();
    assert_eq!(err.code, ErrorCode::NoScoreFiles);
}
