//! Error kinds shared across the toolkit.
//!
//! Each enum covers one failure domain: model architecture validation,
//! corpus/manifest/checkpoint access, the optimization loop, and batch
//! text conversion. All of them propagate straight to the CLI boundary,
//! which prints the chain and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed model architecture parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The hidden width list does not line up with the hidden layer count.
    #[error("expected {expected} hidden layer sizes, got {got}")]
    HiddenSizeMismatch { expected: usize, got: usize },
    /// A layer was configured with zero neurons.
    #[error("hidden layer {index} has zero width")]
    ZeroWidth { index: usize },
}

/// Missing or unreadable corpus, manifest, or checkpoint data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no waveform files found under {0}")]
    EmptyCorpus(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read clip {path}")]
    UnreadableClip {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("manifest row {row} references unknown phoneme category '{category}'")]
    UnknownCategory { row: usize, category: String },
    #[error("dataset index {index} out of range ({len} rows)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to parse manifest {path}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("checkpoint {path} is malformed: {reason}")]
    BadCheckpoint { path: PathBuf, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A failure inside a training or evaluation step.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("failed to load a batch item")]
    Batch(#[from] DataError),
    #[error("dataset is empty; nothing to train on")]
    EmptyDataset,
}

/// A failure inside a batch transformation.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to convert item {index}: {reason}")]
    Item { index: usize, reason: String },
    #[error("failed to load lexicon {path}: {reason}")]
    Lexicon { path: PathBuf, reason: String },
}
