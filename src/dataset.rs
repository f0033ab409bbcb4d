//! Dataset adapter presenting manifest rows as trainable waveform pairs.
//!
//! Every item is an autoencoder pair: the clip's waveform, padded or truncated
//! to a fixed per-run length, serves as both the input and the reconstruction
//! target. Batched or shuffled iteration is left to the training loop; the
//! adapter only guarantees stable indexed lookup and consistent item shape.

use crate::audio::io::WavIo;
use crate::error::DataError;
use crate::manifest::{read_manifest, ManifestEntry};
use crate::perf::{self, Metric};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bijective mapping between phoneme category names and ordinal codes.
///
/// Categories are kept sorted so the encoding is stable across runs on the
/// same corpus. The encoding is persisted inside the checkpoint so inference
/// can decode categories consistently later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoding {
    categories: Vec<String>,
}

impl LabelEncoding {
    /// Build the encoding from the subdirectory names under a phoneme corpus.
    pub fn from_dir(phoneme_dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let mut categories = Vec::new();
        for entry in std::fs::read_dir(phoneme_dir.as_ref())? {
            let entry = entry?;
            if entry.path().is_dir() {
                categories.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        categories.sort();
        Ok(Self { categories })
    }

    /// Build the encoding from an already-known category list.
    pub fn from_categories(mut categories: Vec<String>) -> Self {
        categories.sort();
        Self { categories }
    }

    /// Ordinal code for a category name.
    pub fn encode(&self, category: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|probe| probe.as_str().cmp(category))
            .ok()
    }

    /// Category name for an ordinal code.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.categories.get(code).map(String::as_str)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// An (input, target) waveform pair; identical for autoencoder training.
#[derive(Debug, Clone)]
pub struct WavePair {
    pub input: Vec<f32>,
    pub target: Vec<f32>,
}

/// Indexable collection of fixed-length waveform pairs backed by a manifest.
#[derive(Debug)]
pub struct AudioEncoderDataset {
    entries: Vec<ManifestEntry>,
    clip_dir: PathBuf,
    wave_size: usize,
    labels: LabelEncoding,
}

impl AudioEncoderDataset {
    /// Load the manifest and build the label encoding from the phoneme corpus.
    pub fn new(
        manifest: impl AsRef<Path>,
        clip_dir: impl AsRef<Path>,
        phoneme_dir: impl AsRef<Path>,
        wave_size: usize,
    ) -> Result<Self, DataError> {
        let entries = read_manifest(manifest)?;
        let labels = LabelEncoding::from_dir(phoneme_dir)?;
        perf::add_count(Metric::ManifestRows, entries.len() as u64);
        Ok(Self {
            entries,
            clip_dir: clip_dir.as_ref().to_path_buf(),
            wave_size,
            labels,
        })
    }

    /// Number of manifest rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fixed waveform length shared by every item.
    pub fn wave_size(&self) -> usize {
        self.wave_size
    }

    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    /// Load the i-th clip as a fixed-length autoencoder pair.
    pub fn get(&self, index: usize) -> Result<WavePair, DataError> {
        let entry = self.entry(index)?;
        let _span = perf::span(Metric::DatasetClipRead);
        let wave = WavIo::read_fixed(self.clip_dir.join(&entry.clip), self.wave_size)?;
        perf::add_count(Metric::DatasetClips, 1);
        Ok(WavePair {
            input: wave.clone(),
            target: wave,
        })
    }

    /// Ordinal phoneme category code for the i-th row.
    pub fn label(&self, index: usize) -> Result<usize, DataError> {
        let entry = self.entry(index)?;
        self.labels
            .encode(&entry.phonemes)
            .ok_or_else(|| DataError::UnknownCategory {
                row: index,
                category: entry.phonemes.clone(),
            })
    }

    fn entry(&self, index: usize) -> Result<&ManifestEntry, DataError> {
        self.entries.get(index).ok_or(DataError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioEncoderDataset, LabelEncoding};
    use crate::audio::io::WavIo;
    use crate::error::DataError;
    use tempfile::{tempdir, TempDir};

    fn corpus(clip_lens: &[usize]) -> (TempDir, std::path::PathBuf) {
        let dir = tempdir().expect("tempdir");
        let clip_dir = dir.path().join("clips");
        let phoneme_dir = dir.path().join("phonemes");
        std::fs::create_dir(&clip_dir).expect("mkdir");
        std::fs::create_dir_all(phoneme_dir.join("ah")).expect("mkdir");
        std::fs::create_dir_all(phoneme_dir.join("ee")).expect("mkdir");

        let mut rows = String::from("sentence\tclip\tphonemes\tipa\n");
        for (idx, len) in clip_lens.iter().enumerate() {
            let name = format!("clip{idx}.wav");
            WavIo::write_wav(clip_dir.join(&name), &vec![0.5; *len], 16000).expect("write clip");
            rows.push_str(&format!("sentence {idx}\t{name}\tah\t\n"));
        }
        let manifest = dir.path().join("data.tsv");
        std::fs::write(&manifest, rows).expect("write manifest");
        (dir, manifest)
    }

    #[test]
    fn items_always_match_the_fixed_length() {
        let (dir, manifest) = corpus(&[3, 8, 12]);
        let dataset = AudioEncoderDataset::new(
            &manifest,
            dir.path().join("clips"),
            dir.path().join("phonemes"),
            8,
        )
        .expect("dataset");

        assert_eq!(dataset.len(), 3);
        for idx in 0..dataset.len() {
            let pair = dataset.get(idx).expect("item");
            assert_eq!(pair.input.len(), 8);
            assert_eq!(pair.target.len(), 8);
            assert_eq!(pair.input, pair.target);
        }
    }

    #[test]
    fn labels_are_sorted_and_bijective() {
        let encoding =
            LabelEncoding::from_categories(vec!["oo".to_string(), "ah".to_string(), "ee".to_string()]);
        assert_eq!(encoding.len(), 3);
        assert_eq!(encoding.encode("ah"), Some(0));
        assert_eq!(encoding.encode("oo"), Some(2));
        assert_eq!(encoding.decode(1), Some("ee"));
        assert_eq!(encoding.encode("zz"), None);
    }

    #[test]
    fn row_labels_come_from_the_phoneme_corpus() {
        let (dir, manifest) = corpus(&[4]);
        let dataset = AudioEncoderDataset::new(
            &manifest,
            dir.path().join("clips"),
            dir.path().join("phonemes"),
            4,
        )
        .expect("dataset");

        assert_eq!(dataset.labels().len(), 2);
        assert_eq!(dataset.label(0).expect("label"), 0);
    }

    #[test]
    fn missing_clip_is_a_data_error() {
        let (dir, manifest) = corpus(&[4]);
        std::fs::remove_file(dir.path().join("clips/clip0.wav")).expect("remove clip");
        let dataset = AudioEncoderDataset::new(
            &manifest,
            dir.path().join("clips"),
            dir.path().join("phonemes"),
            4,
        )
        .expect("dataset");

        let err = dataset.get(0).unwrap_err();
        assert!(matches!(err, DataError::UnreadableClip { .. }));
    }
}
