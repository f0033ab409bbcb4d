use crate::error::ConversionError;
use std::collections::HashMap;
use std::path::Path;

/// Marker appended to words the transcriber could not resolve.
pub const UNRESOLVED_MARKER: char = '*';

/// An English-to-IPA converter.
///
/// Implementations transcribe a sentence word by word. Words they cannot
/// resolve are emitted with their original spelling plus a trailing
/// [`UNRESOLVED_MARKER`], which downstream passes use to retry or drop the
/// entry.
pub trait Transcriber {
    fn transcribe(&self, text: &str) -> String;
}

/// Lexicon-backed transcriber: a word-to-IPA dictionary loaded from JSON.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranscriber {
    words: HashMap<String, String>,
}

impl DictionaryTranscriber {
    /// Load a lexicon from a JSON object mapping words to IPA strings.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConversionError> {
        let path = path.as_ref();
        let lexicon_err = |reason: String| ConversionError::Lexicon {
            path: path.to_path_buf(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| lexicon_err(e.to_string()))?;
        let raw: HashMap<String, String> =
            serde_json::from_str(&data).map_err(|e| lexicon_err(e.to_string()))?;
        Ok(Self::from_words(raw))
    }

    /// Build a lexicon from in-memory pairs; lookups are case-insensitive.
    pub fn from_words(words: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|(word, ipa)| (word.to_lowercase(), ipa))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn transcribe_token(&self, token: &str) -> String {
        let is_word_char = |c: char| c.is_alphanumeric() || c == '\'' || c == '-';
        let start = token.find(is_word_char).unwrap_or(token.len());
        let end = token
            .char_indices()
            .filter(|(_, c)| is_word_char(*c))
            .last()
            .map_or(start, |(idx, c)| idx + c.len_utf8());
        let (prefix, rest) = token.split_at(start);
        let (core, suffix) = rest.split_at(end - start);

        if core.is_empty() {
            return token.to_string();
        }
        match self.words.get(&core.to_lowercase()) {
            Some(ipa) => format!("{prefix}{ipa}{suffix}"),
            None => format!("{prefix}{core}{UNRESOLVED_MARKER}{suffix}"),
        }
    }
}

impl Transcriber for DictionaryTranscriber {
    fn transcribe(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| self.transcribe_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::{DictionaryTranscriber, Transcriber};

    fn lexicon() -> DictionaryTranscriber {
        DictionaryTranscriber::from_words([
            ("well".to_string(), "wɛl".to_string()),
            ("known".to_string(), "noʊn".to_string()),
            ("the".to_string(), "ðə".to_string()),
        ])
    }

    #[test]
    fn known_words_are_converted() {
        assert_eq!(lexicon().transcribe("the well"), "ðə wɛl");
    }

    #[test]
    fn unknown_words_keep_their_spelling_with_a_marker() {
        assert_eq!(lexicon().transcribe("the gizmo"), "ðə gizmo*");
    }

    #[test]
    fn punctuation_stays_attached_outside_the_marker() {
        assert_eq!(lexicon().transcribe("gizmo, well."), "gizmo*, wɛl.");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lexicon().transcribe("The WELL"), "ðə wɛl");
    }

    #[test]
    fn hyphenated_compounds_stay_whole_when_unknown() {
        assert_eq!(lexicon().transcribe("well-known"), "well-known*");
    }
}
