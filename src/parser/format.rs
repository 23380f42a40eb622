//! Display formatting for task text
//!
//! Tasks are shown in sentence case. A few words stay capitalised wherever
//! they appear so that the important part of a reminder stands out on a
//! large-print screen: care and family nouns, common action verbs and
//! frequent first names.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static CARE_NOUNS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "doctor", "nurse", "hospital", "pharmacy", "medicine", "pill", "tablet", "dose",
        "appointment", "clinic", "emergency", "son", "daughter", "wife", "husband", "mother",
        "father", "mom", "dad", "grandpa", "grandma", "family", "love",
    ]
    .into_iter()
    .collect()
});

static ACTION_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "call", "take", "visit", "see", "meet", "schedule", "book", "remember", "remind",
        "check", "monitor", "measure", "walk", "exercise", "eat", "drink", "read", "write",
    ]
    .into_iter()
    .collect()
});

static PROPER_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "james", "john", "mary", "sarah", "michael", "david", "lisa", "anna", "paul", "peter",
        "robert", "william", "elizabeth",
    ]
    .into_iter()
    .collect()
});

fn is_emphasised(word: &str) -> bool {
    CARE_NOUNS.contains(word) || ACTION_VERBS.contains(word) || PROPER_NAMES.contains(word)
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format task text for display: `"  walk DOG with john "` -> `"Walk dog with John"`.
///
/// Case in the input is ignored, so formatting twice gives the same result.
pub fn format_task_text(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            let key = lower.trim_matches(|c: char| !c.is_alphanumeric());
            if index == 0 || is_emphasised(key) {
                capitalize(word)
            } else {
                lower
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
