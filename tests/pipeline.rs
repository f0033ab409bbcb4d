use phonegen::ipa::transcribe::DictionaryTranscriber;
use phonegen::ipa::update_manifest;
use phonegen::manifest::{read_manifest, write_manifest, ManifestEntry};
use phonegen::review::{Correction, ReviewItem, ReviewSession, ReviewSurface};
use tempfile::tempdir;

fn entry(sentence: &str, ipa: Option<&str>) -> ManifestEntry {
    ManifestEntry {
        sentence: sentence.to_string(),
        clip: "clip.wav".to_string(),
        phonemes: "ah".to_string(),
        ipa: ipa.map(str::to_string),
    }
}

fn lexicon() -> DictionaryTranscriber {
    DictionaryTranscriber::from_words([
        ("a".to_string(), "ə".to_string()),
        ("well".to_string(), "wɛl".to_string()),
        ("known".to_string(), "noʊn".to_string()),
        ("fact".to_string(), "fækt".to_string()),
    ])
}

#[test]
fn conversion_pipeline_drops_unresolved_rows_and_keeps_existing_ipa() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.tsv");
    write_manifest(
        &path,
        &[
            entry("a well known fact", None),
            entry("whatever", Some("pre-existing transcription")),
            entry("a zorp fact", None),
        ],
    )
    .expect("write manifest");

    let kept = update_manifest(&path, &lexicon(), 2).expect("pipeline");

    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].ipa.as_deref(), Some("ə wɛl noʊn fækt"));
    assert_eq!(kept[1].ipa.as_deref(), Some("pre-existing transcription"));

    let on_disk = read_manifest(&path).expect("read back");
    assert_eq!(on_disk, kept);
}

#[test]
fn hyphenated_compounds_resolve_through_the_full_pipeline() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.tsv");
    write_manifest(&path, &[entry("a well-known fact", None)]).expect("write manifest");

    let kept = update_manifest(&path, &lexicon(), 64).expect("pipeline");

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].ipa.as_deref(), Some("ə wɛl.noʊn fækt"));
}

#[test]
fn rerunning_the_pipeline_leaves_the_manifest_unchanged() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.tsv");
    write_manifest(
        &path,
        &[entry("a well known fact", None), entry("a zorp fact", None)],
    )
    .expect("write manifest");

    let first = update_manifest(&path, &lexicon(), 8).expect("first run");
    let second = update_manifest(&path, &lexicon(), 8).expect("second run");
    assert_eq!(first, second);
    assert_eq!(read_manifest(&path).expect("read back"), second);
}

/// Accepts every row, replacing transcriptions of flagged sentences.
struct FixEverything;

impl ReviewSurface for FixEverything {
    fn review_page(
        &mut self,
        items: &[ReviewItem],
        _remaining: usize,
    ) -> anyhow::Result<Vec<Correction>> {
        Ok(items
            .iter()
            .map(|_| Correction::Replace("reviewed".to_string()))
            .collect())
    }
}

#[test]
fn review_after_conversion_persists_corrections() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.tsv");
    write_manifest(&path, &[entry("a well known fact", None)]).expect("write manifest");

    update_manifest(&path, &lexicon(), 8).expect("pipeline");

    let entries = read_manifest(&path).expect("read");
    let corrected = ReviewSession::new(&path, entries, 10)
        .run(&mut FixEverything)
        .expect("review");

    assert_eq!(corrected[0].ipa.as_deref(), Some("reviewed"));
    assert_eq!(read_manifest(&path).expect("read back"), corrected);
}
