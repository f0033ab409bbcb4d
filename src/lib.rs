//! # phonegen - Phoneme dataset preparation and waveform autoencoder training
//!
//! A small toolkit with two halves:
//!
//! 1. **Training**: build a dataset from a TSV manifest plus WAV clips, fix the
//!    waveform length from the largest clip in the phoneme corpus, and train a
//!    feed-forward autoencoder ([`Perceptron`]) to reconstruct its input until
//!    a loss threshold or epoch budget is met. The trained model and its label
//!    encoding persist together as one SafeTensors checkpoint.
//!
//! 2. **IPA preparation**: convert manifest sentences to phonemic
//!    transcription with a lexicon-backed [`Transcriber`], retry unresolved
//!    hyphenated compounds segment by segment, drop rows that stay
//!    unresolved, and optionally review the results page by page through a
//!    [`ReviewSurface`].
//!
//! ## Quick start
//!
//! ```no_run
//! use burn::backend::Autodiff;
//! use burn::optim::SgdConfig;
//! use burn_ndarray::{NdArray, NdArrayDevice};
//! use phonegen::audio::sizing::largest_waveform_size;
//! use phonegen::dataset::AudioEncoderDataset;
//! use phonegen::model::PerceptronConfig;
//! use phonegen::training::train_epoch;
//!
//! type B = Autodiff<NdArray<f32>>;
//!
//! let device = NdArrayDevice::default();
//! let wave_size = largest_waveform_size("corpus/phonemes").unwrap();
//! let dataset =
//!     AudioEncoderDataset::new("data.tsv", "corpus/clips", "corpus/phonemes", wave_size)
//!         .unwrap();
//!
//! let model = PerceptronConfig::uniform(wave_size, 1, 3000, false)
//!     .init::<B>(&device)
//!     .unwrap();
//! let mut optimizer = SgdConfig::new().init();
//! let (_model, loss) =
//!     train_epoch(&dataset, model, &mut optimizer, 0.01, 32, &device).unwrap();
//! println!("epoch loss: {loss}");
//! ```
//!
//! Backends follow the `burn` convention: CPU training through
//! `Autodiff<NdArray>`, with WGPU available behind the `backend-wgpu` feature.
//! The backend is always an explicit choice at construction time so tests can
//! pin CPU execution deterministically.

pub mod audio;
pub mod checkpoint;
pub mod dataset;
pub mod error;
pub mod ipa;
pub mod manifest;
pub mod model;
pub mod perf;
pub mod review;
pub mod training;

// Re-exports forming the public API
pub use checkpoint::{load_checkpoint, load_or_init, save_checkpoint, ModelSource};
pub use dataset::{AudioEncoderDataset, LabelEncoding};
pub use error::{ConfigError, ConversionError, DataError, TrainingError};
pub use ipa::transcribe::{DictionaryTranscriber, Transcriber};
pub use manifest::{read_manifest, write_manifest, ManifestEntry};
pub use model::{Perceptron, PerceptronConfig};
pub use review::{ConsoleReview, ReviewSession, ReviewSurface};
pub use training::{eval_epoch, train_epoch};
