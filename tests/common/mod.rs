//! Shared test fixtures: a miniature clip corpus with a TSV manifest.

use phonegen::audio::io::WavIo;
use phonegen::manifest::{write_manifest, ManifestEntry};
use std::path::{Path, PathBuf};

/// Lay out a small training corpus under `root`: a clip directory, two
/// phoneme category directories, and a TSV manifest referencing the clips.
/// Returns the manifest path.
pub fn build_corpus(root: &Path, clip_lens: &[usize]) -> PathBuf {
    let clip_dir = root.join("clips");
    let phoneme_dir = root.join("phonemes");
    std::fs::create_dir(&clip_dir).expect("create clip dir");
    std::fs::create_dir_all(phoneme_dir.join("ah")).expect("create phoneme dir");
    std::fs::create_dir_all(phoneme_dir.join("ee")).expect("create phoneme dir");

    let longest = clip_lens.iter().copied().max().unwrap_or(4);
    WavIo::write_wav(phoneme_dir.join("ah/sample.wav"), &vec![0.5; longest], 16000)
        .expect("write phoneme clip");
    WavIo::write_wav(phoneme_dir.join("ee/sample.wav"), &vec![0.5; 2], 16000)
        .expect("write phoneme clip");

    let entries: Vec<ManifestEntry> = clip_lens
        .iter()
        .enumerate()
        .map(|(idx, len)| {
            let clip = format!("clip{idx}.wav");
            WavIo::write_wav(clip_dir.join(&clip), &vec![0.25; *len], 16000)
                .expect("write clip");
            ManifestEntry {
                sentence: format!("sentence {idx}"),
                clip,
                phonemes: "ah".to_string(),
                ipa: None,
            }
        })
        .collect();

    let manifest = root.join("data.tsv");
    write_manifest(&manifest, &entries).expect("write manifest");
    manifest
}
