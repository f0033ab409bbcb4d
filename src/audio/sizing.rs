use crate::audio::io::WavIo;
use crate::error::DataError;
use std::path::{Path, PathBuf};

/// Find the largest per-channel sample count among all WAV clips under `dir`.
///
/// The scan is recursive and read-only. The result fixes the input and output
/// dimensionality of the autoencoder for the whole training run, so callers
/// that already know the value can skip the scan entirely.
///
/// # Errors
///
/// Returns [`DataError::EmptyCorpus`] when no WAV files exist under `dir`,
/// and propagates any unreadable file or directory.
pub fn largest_waveform_size(dir: impl AsRef<Path>) -> Result<usize, DataError> {
    let dir = dir.as_ref();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];
    let mut largest: Option<usize> = None;

    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_wav(&path) {
                let count = WavIo::sample_count(&path)?;
                largest = Some(largest.map_or(count, |best| best.max(count)));
            }
        }
    }

    largest.ok_or_else(|| DataError::EmptyCorpus(dir.to_path_buf()))
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}
