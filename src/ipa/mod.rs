//! Batch English-to-IPA conversion over the manifest.
//!
//! The pipeline is three passes, each rewriting the manifest wholesale so an
//! interrupted run can be resumed by simply running again:
//!
//! 1. Fill: rows without an `ipa` field get a fresh transcription. Rows that
//!    already carry one are left byte-identical, which makes the whole
//!    pipeline idempotent.
//! 2. Hyphen resolution: unresolved hyphenated compounds are split, each
//!    segment transcribed independently, and rejoined with a syllable
//!    boundary when every segment resolves.
//! 3. Filter: rows still carrying an unresolved marker are dropped.

pub mod batch;
pub mod transcribe;

use crate::error::ConversionError;
use crate::manifest::{read_manifest, write_manifest, ManifestEntry};
use crate::perf::{self, Metric};
use anyhow::Result;
use batch::round_robin_map;
use regex::Regex;
use std::path::Path;
use transcribe::{Transcriber, UNRESOLVED_MARKER};

/// Separator inserted between segment transcriptions of a compound word.
pub const SYLLABLE_BOUNDARY: &str = ".";

/// Attach a transcription to every row that lacks one.
///
/// Rows with an existing `ipa` value pass through untouched; presence is the
/// only check, so a transcription with markers is not recomputed here.
pub fn fill_missing(
    entries: &[ManifestEntry],
    transcriber: &impl Transcriber,
    chunk_size: usize,
) -> Result<Vec<ManifestEntry>, ConversionError> {
    if entries.iter().all(ManifestEntry::has_ipa) {
        return Ok(entries.to_vec());
    }
    round_robin_map(
        entries,
        |entry| {
            let mut entry = entry.clone();
            if entry.ipa.is_none() {
                let _span = perf::span(Metric::IpaTranscribe);
                entry.ipa = Some(transcriber.transcribe(&entry.sentence));
                perf::add_count(Metric::IpaSentences, 1);
            }
            Ok(entry)
        },
        chunk_size,
        "Converting sentences to IPA",
    )
}

/// Retry unresolved hyphenated compounds segment by segment.
///
/// A token like `well-known*` is split on hyphens, each segment transcribed
/// on its own, and the results joined with [`SYLLABLE_BOUNDARY`]. The
/// original token is only replaced when the reassembled transcription is
/// non-empty and fully resolved.
pub fn resolve_hyphenated(entries: &mut [ManifestEntry], transcriber: &impl Transcriber) {
    let pattern = Regex::new(r"[a-zA-Z]+-[a-zA-Z\-']+\*").expect("hyphenated token pattern");

    for entry in entries.iter_mut() {
        let Some(ipa) = entry.ipa.as_mut() else {
            continue;
        };
        let tokens: Vec<String> = pattern
            .find_iter(ipa)
            .map(|m| m.as_str().to_string())
            .collect();
        for token in tokens {
            let replacement = token
                .split('-')
                .map(|segment| {
                    let segment: String =
                        segment.chars().filter(|&c| c != UNRESOLVED_MARKER).collect();
                    transcriber.transcribe(&segment)
                })
                .collect::<Vec<_>>()
                .join(SYLLABLE_BOUNDARY);

            if !replacement.is_empty() && !replacement.contains(UNRESOLVED_MARKER) {
                *ipa = ipa.replace(&token, &replacement);
            }
        }
    }
}

/// Drop every row whose transcription still contains an unresolved marker.
pub fn drop_unresolved(entries: Vec<ManifestEntry>) -> Vec<ManifestEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .ipa
                .as_deref()
                .is_some_and(|ipa| !ipa.contains(UNRESOLVED_MARKER))
        })
        .collect()
}

/// Run the full conversion pipeline against a manifest file.
///
/// The manifest is rewritten after each pass; the returned rows are the
/// surviving, fully-resolved entries.
pub fn update_manifest(
    path: impl AsRef<Path>,
    transcriber: &impl Transcriber,
    chunk_size: usize,
) -> Result<Vec<ManifestEntry>> {
    let path = path.as_ref();
    let entries = read_manifest(path)?;

    let mut entries = fill_missing(&entries, transcriber, chunk_size)?;
    write_manifest(path, &entries)?;

    resolve_hyphenated(&mut entries, transcriber);
    write_manifest(path, &entries)?;

    let kept = drop_unresolved(entries);
    write_manifest(path, &kept)?;
    Ok(kept)
}
