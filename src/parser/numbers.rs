//! Spelled-out number conversion
//!
//! Speech recognisers tend to emit "ten" rather than "10". The command
//! patterns only understand digits, so every token gets a chance to be
//! rewritten before matching. Each token is converted on its own, which
//! means "twenty five" becomes "20 5" and not "25".

use log::trace;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Number words that map to a single value
static NUMBER_WORDS: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("zero", 0);
    map.insert("one", 1);
    map.insert("two", 2);
    map.insert("three", 3);
    map.insert("four", 4);
    map.insert("five", 5);
    map.insert("six", 6);
    map.insert("seven", 7);
    map.insert("eight", 8);
    map.insert("nine", 9);
    map.insert("ten", 10);
    map.insert("eleven", 11);
    map.insert("twelve", 12);
    map.insert("thirteen", 13);
    map.insert("fourteen", 14);
    map.insert("fifteen", 15);
    map.insert("sixteen", 16);
    map.insert("seventeen", 17);
    map.insert("eighteen", 18);
    map.insert("nineteen", 19);
    map.insert("twenty", 20);
    map.insert("thirty", 30);
    map.insert("forty", 40);
    map.insert("fifty", 50);
    map.insert("sixty", 60);
    map.insert("seventy", 70);
    map.insert("eighty", 80);
    map.insert("ninety", 90);
    map.insert("hundred", 100);
    map.insert("thousand", 1_000);
    map.insert("million", 1_000_000);
    map.insert("billion", 1_000_000_000);
    map
});

/// Convert a single token to an integer.
///
/// Leading and trailing punctuation is ignored, so `"ten,"` converts to 10.
/// Digit strings convert to themselves.
pub fn word_to_number(token: &str) -> Option<u64> {
    let cleaned = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        return cleaned.parse().ok();
    }

    NUMBER_WORDS.get(cleaned.as_str()).copied()
}

/// Replace every token that converts to a number with its digits.
///
/// Tokens that are not numbers are left as they are.
pub fn convert_number_words(text: &str) -> String {
    let converted = text
        .split_whitespace()
        .map(|token| match word_to_number(token) {
            Some(value) => value.to_string(),
            None => token.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    trace!("Number-word conversion: '{}' -> '{}'", text, converted);
    converted
}
