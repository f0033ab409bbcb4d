//! TSV manifest reading and writing.
//!
//! The manifest is a tab-delimited file with one row per recorded sentence:
//! the sentence text, the clip file name, the phoneme category directory the
//! clip's sub-clips live in, and an optional IPA transcription. Rows are read
//! and rewritten wholesale; row order is the only identity a row has.

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One row of the dataset manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Orthographic sentence text.
    pub sentence: String,
    /// Clip file name, relative to the clip directory.
    pub clip: String,
    /// Phoneme category directory name for this row.
    pub phonemes: String,
    /// Phonemic transcription; `None` until the IPA pass fills it in.
    /// The column may be absent entirely in manifests that predate the pass.
    #[serde(default)]
    pub ipa: Option<String>,
}

impl ManifestEntry {
    /// Whether the row carries a transcription at all.
    ///
    /// This is a presence check, not a validity check: a transcription with
    /// unresolved markers still counts as present.
    pub fn has_ipa(&self) -> bool {
        self.ipa.is_some()
    }
}

/// Read all manifest rows from a tab-delimited file.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<ManifestEntry>, DataError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|source| DataError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

    let mut entries = Vec::new();
    for row in reader.deserialize::<ManifestEntry>() {
        entries.push(row.map_err(|source| DataError::Manifest {
            path: path.to_path_buf(),
            source,
        })?);
    }
    Ok(entries)
}

/// Rewrite the manifest file with the given rows.
pub fn write_manifest(
    path: impl AsRef<Path>,
    entries: &[ManifestEntry],
) -> Result<(), DataError> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|source| DataError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

    for entry in entries {
        writer.serialize(entry).map_err(|source| DataError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;
    }
    writer.flush()?;
    Ok(())
}
