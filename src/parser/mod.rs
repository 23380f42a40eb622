/// Voxtask parser module
///
/// Turns a spoken or typed utterance into one of four task commands.
pub mod format;
pub mod help;
pub mod intents;
pub mod normalize;
pub mod numbers;
pub mod time;
pub mod traits;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};

pub use format::format_task_text;
pub use intents::IntentPatterns;
pub use normalize::PhraseNormalizer;
pub use time::{normalize_time, ClockTime, Period};
pub use traits::{ParsedCommand, Parser};

/// Fixed tables the interpreter is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub stopwords: Vec<String>,
    pub misrecognitions: Vec<(String, String)>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            stopwords: normalize::DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            misrecognitions: normalize::DEFAULT_MISRECOGNITIONS
                .iter()
                .map(|(wrong, right)| (wrong.to_string(), right.to_string()))
                .collect(),
        }
    }
}

/// Rule-based command interpreter
///
/// Matchers run in a fixed order and the first success wins: delete, the
/// delete-verb fallback, mark-done, list, relative-time add, absolute-time
/// add. Built once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct CommandParser {
    normalizer: PhraseNormalizer,
    patterns: IntentPatterns,
}

impl CommandParser {
    pub fn new(config: &ParserConfig) -> Result<Self, regex::Error> {
        let normalizer = PhraseNormalizer::new(
            &config.stopwords,
            config.misrecognitions.iter().map(|(wrong, right)| (wrong.as_str(), right.as_str())),
        )?;
        let patterns = IntentPatterns::compile()?;
        Ok(Self { normalizer, patterns })
    }

    /// Interpret `input` relative to the local wall clock
    pub fn parse_command(&self, input: &str) -> Option<ParsedCommand> {
        self.parse_at(input, Local::now().naive_local())
    }

    /// Interpret `input`, resolving relative delays against `now`
    pub fn parse_at(&self, input: &str, now: NaiveDateTime) -> Option<ParsedCommand> {
        if input.trim().is_empty() {
            debug!("Empty utterance, nothing to parse");
            return None;
        }

        let text = self.normalizer.normalize(input);
        debug!("Parsing command: '{}' -> normalized: '{}'", input, text);
        if text.is_empty() {
            return None;
        }

        let command = self.dispatch(&text, now);
        match &command {
            Some(command) => info!("Recognised {} command", command.kind()),
            None => info!("No command pattern matched"),
        }
        command
    }

    fn dispatch(&self, text: &str, now: NaiveDateTime) -> Option<ParsedCommand> {
        if let Some(command) = self.patterns.match_delete(text) {
            return Some(command);
        }
        if self.patterns.looks_like_delete(text) {
            if let Some(command) = self.patterns.fallback_delete(text) {
                return Some(command);
            }
        }
        if let Some(command) = self.patterns.match_mark_done(text) {
            return Some(command);
        }
        if self.patterns.is_list_tasks(text) {
            return Some(ParsedCommand::ListTasks);
        }
        if let Some(command) = self.patterns.match_relative_time(text, now) {
            return Some(command);
        }
        self.patterns.match_absolute_time(text)
    }

    /// Format free text as a task title, as used for manually typed tasks
    pub fn format_task_text(&self, text: &str) -> String {
        format_task_text(text)
    }
}

impl Parser for CommandParser {
    fn parse(&self, input: &str) -> Option<ParsedCommand> {
        self.parse_command(input)
    }
}
