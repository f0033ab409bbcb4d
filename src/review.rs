//! Human review of converted transcriptions.
//!
//! The core pipeline has no dependency on any UI toolkit: the review
//! capability is expressed as the [`ReviewSurface`] trait, and
//! [`ReviewSession`] drives it page by page. Each round samples a page of
//! unreviewed rows without replacement, collects per-row decisions, applies
//! any replacement transcriptions, and rewrites the whole manifest before
//! moving on. The session ends when every row has been shown once.

use crate::manifest::{write_manifest, ManifestEntry};
use anyhow::Result;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One row as shown to a reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    /// Row index in the manifest.
    pub index: usize,
    pub sentence: String,
    pub ipa: String,
}

/// The reviewer's verdict on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    Keep,
    Replace(String),
}

/// A surface capable of presenting a page of rows and collecting verdicts.
///
/// Must return exactly one [`Correction`] per presented item, in order.
pub trait ReviewSurface {
    fn review_page(&mut self, items: &[ReviewItem], remaining: usize) -> Result<Vec<Correction>>;
}

/// Drives a [`ReviewSurface`] over a manifest until every row is reviewed.
#[derive(Debug)]
pub struct ReviewSession {
    manifest_path: PathBuf,
    entries: Vec<ManifestEntry>,
    pool: Vec<usize>,
    page_size: usize,
}

impl ReviewSession {
    /// Start a session over the given rows.
    ///
    /// The unreviewed pool is shuffled up front, which is equivalent to
    /// sampling each page randomly without replacement.
    pub fn new(
        manifest_path: impl AsRef<Path>,
        entries: Vec<ManifestEntry>,
        page_size: usize,
    ) -> Self {
        let mut pool: Vec<usize> = (0..entries.len()).collect();
        pool.shuffle(&mut thread_rng());
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            entries,
            pool,
            page_size: page_size.max(1),
        }
    }

    /// Run the session to completion, returning the corrected rows.
    pub fn run(mut self, surface: &mut dyn ReviewSurface) -> Result<Vec<ManifestEntry>> {
        while !self.pool.is_empty() {
            let take = self.page_size.min(self.pool.len());
            let page: Vec<usize> = self.pool.drain(..take).collect();

            let items: Vec<ReviewItem> = page
                .iter()
                .map(|&index| ReviewItem {
                    index,
                    sentence: self.entries[index].sentence.clone(),
                    ipa: self.entries[index].ipa.clone().unwrap_or_default(),
                })
                .collect();

            let corrections = surface.review_page(&items, self.pool.len())?;
            if corrections.len() != items.len() {
                anyhow::bail!(
                    "review surface returned {} corrections for {} items",
                    corrections.len(),
                    items.len()
                );
            }

            for (item, correction) in items.iter().zip(corrections) {
                if let Correction::Replace(ipa) = correction {
                    self.entries[item.index].ipa = Some(ipa);
                }
            }
            write_manifest(&self.manifest_path, &self.entries)?;
        }
        Ok(self.entries)
    }
}

/// Console implementation of [`ReviewSurface`] for terminal sessions.
///
/// Prints each sentence with its transcription, asks whether it is wrong,
/// and prompts for a replacement when flagged.
#[derive(Debug, Default)]
pub struct ConsoleReview;

impl ReviewSurface for ConsoleReview {
    fn review_page(&mut self, items: &[ReviewItem], remaining: usize) -> Result<Vec<Correction>> {
        let stdin = std::io::stdin();
        let mut corrections = Vec::with_capacity(items.len());

        for item in items {
            println!("\n\"{}\"\n  -> {}", item.sentence, item.ipa);
            print!("Flag as wrong? [y/N] ");
            std::io::stdout().flush()?;

            let mut answer = String::new();
            stdin.read_line(&mut answer)?;
            if answer.trim().eq_ignore_ascii_case("y") {
                print!("Replacement IPA: ");
                std::io::stdout().flush()?;
                let mut replacement = String::new();
                stdin.read_line(&mut replacement)?;
                corrections.push(Correction::Replace(replacement.trim().to_string()));
            } else {
                corrections.push(Correction::Keep);
            }
        }

        println!("{remaining} entries remain");
        Ok(corrections)
    }
}
