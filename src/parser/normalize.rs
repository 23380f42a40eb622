//! Phrase normalization
//!
//! Cleans a raw utterance before any intent matching: lowercase, drop one
//! polite lead-in ("please", "could you", "hey"), repair words the speech
//! recogniser commonly mishears, and collapse whitespace.

use log::trace;
use regex::{NoExpand, Regex};

/// Polite fillers stripped from the start of an utterance
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "please", "kindly", "could you", "can you", "would you", "hey", "hi", "hello", "assistant",
    "okay", "ok",
];

/// Known misrecognitions, applied in this order
pub const DEFAULT_MISRECOGNITIONS: &[(&str, &str)] = &[
    ("the late", "delete"),
    ("delay it", "delete"),
    ("delete it", "delete"),
    ("dillet", "delete"),
    ("rid my tasks", "read my tasks"),
    ("reed my tasks", "read my tasks"),
    ("tax", "task"),
    ("tusk", "task"),
    ("ask", "task"),
];

#[derive(Debug, Clone)]
pub struct PhraseNormalizer {
    stopwords: Vec<String>,
    misrecognitions: Vec<(Regex, String)>,
}

impl PhraseNormalizer {
    /// Build a normalizer from ordered stopword and substitution tables.
    ///
    /// Substitutions match whole words only, so "ask" never rewrites "task".
    pub fn new<S, W, R>(stopwords: S, misrecognitions: W) -> Result<Self, regex::Error>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        W: IntoIterator<Item = (R, R)>,
        R: AsRef<str>,
    {
        let stopwords = stopwords.into_iter().map(|s| s.as_ref().to_lowercase()).collect();
        let misrecognitions = misrecognitions
            .into_iter()
            .map(|(wrong, right)| -> Result<(Regex, String), regex::Error> {
                let pattern = format!(r"\b{}\b", regex::escape(&wrong.as_ref().to_lowercase()));
                Ok((Regex::new(&pattern)?, right.as_ref().to_lowercase()))
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { stopwords, misrecognitions })
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut normalized = text.trim().to_lowercase();

        if let Some(rest) = self.strip_stopword(&normalized) {
            normalized = rest.to_string();
        }

        for (wrong, right) in &self.misrecognitions {
            if wrong.is_match(&normalized) {
                normalized = wrong.replace_all(&normalized, NoExpand(right)).into_owned();
            }
        }

        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        trace!("Normalized phrase '{}' -> '{}'", text, normalized);
        normalized
    }

    fn strip_stopword<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.stopwords.iter().find_map(|word| {
            text.strip_prefix(word.as_str()).and_then(|rest| rest.strip_prefix(' '))
        })
    }
}
