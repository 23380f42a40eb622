//! Intent matchers
//!
//! Each matcher works on normalized text and either extracts a command or
//! declines. The tables are compiled once into [`IntentPatterns`] and never
//! change afterwards, so one instance can be shared freely between threads.

use crate::parser::format::format_task_text;
use crate::parser::numbers::convert_number_words;
use crate::parser::time::{normalize_time, relative_time, TimeUnit};
use crate::parser::traits::ParsedCommand;
use chrono::NaiveDateTime;
use log::{debug, trace};
use regex::{Captures, Match, Regex};

/// Target used when a delete or mark-done command names nothing specific
pub const PLACEHOLDER_TASK: &str = "task";

const DELETE_PATTERNS: &[&str] = &[
    r"^(?:delete|remove|cancel|clear|erase)\s+(?:(?:the|my)\s+)?(?:task\s+(?:for\s+)?)?(?P<target>.*?)(?:\s+task)?(?:\s+(?:at|on|by|for)\s+.+)?$",
    r"\b(?:delete|forget about|cancel)\s+(?:the\s+)?task\s+(?:for\s+)?(?P<target>.+)",
    r"\b(?:delete|remove|cancel)\s+(?P<target>.+)\s+task\b",
    r"^(?:forget about|don't remind me about|do not remind me about)\s+(?P<target>.+?)(?:\s+(?:at|on|by|for)\s+.+)?$",
];

const MARK_DONE_PATTERNS: &[&str] = &[
    r"^(?:done with|completed|finished|i finished|i completed|i've finished|i have finished|i'm done with|i am done with)\s+(?P<target>.+)$",
    r"^(?:mark|set)\s+(?P<target>.+?)\s+(?:as\s+)?(?:done|complete|completed|finished)$",
    r"^(?:task|reminder)\s+(?P<target>.+?)\s+(?:is\s+|are\s+)?(?:done|completed|finished)$",
];

const LIST_PATTERNS: &[&str] = &[
    r"\b(?:show|list|tell|read|what are)(?:\s+me)?\s+(?:all\s+)?(?:my|the|all)\s+(?:tasks?|reminders?)\b",
    r"\bwhat do i have\s+(?:scheduled|planned|today|tomorrow|on\s+(?:my\s+)?(?:list|schedule|agenda))\b",
    r"\bwhat(?:'s|\s+is)\s+(?:on\s+)?(?:my\s+)?(?:scheduled?|agenda|list)\b",
];

const RELATIVE_PATTERNS: &[&str] = &[
    r"\b(?:remind me to|remind me|set task for|set a reminder to)\s+(?P<task>.+?)\s+(?:in|after|by)\s+(?P<amount>\d+)\s+(?P<unit>minute|min|hour|hr)s?\b",
    r"(?P<task>.+?)\s+(?:in|after)\s+(?P<amount>\d+)\s+(?P<unit>minute|min|hour|hr)s?\b",
];

const ABSOLUTE_PATTERNS: &[&str] = &[
    r"\b(?:remind me to|set task for|i need to)\s+(?P<task>.+)\s+(?:at|on|by)\b\s*(?P<time>.+)",
    r"\b(?:remember to|remember|task)\s+(?P<task>.+)\s+(?:at|on|by)\b\s*(?P<time>.+)",
    r"\b(?:i have to|i must)\s+(?P<task>.+)\s+(?:at|on|by)\b\s*(?P<time>.+)",
    r"\bremind me\s+(?P<task>.+)\s+(?:at|on|by)\b\s*(?P<time>.+)",
    r"\b(?:don't forget to|do not forget to|please remember to)\s+(?P<task>.+)\s+(?:at|on|by)\b\s*(?P<time>.+)",
];

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

/// Compiled pattern tables for every intent
#[derive(Debug, Clone)]
pub struct IntentPatterns {
    delete: Vec<Regex>,
    delete_verb: Regex,
    mark_done: Vec<Regex>,
    list: Vec<Regex>,
    relative: Vec<Regex>,
    absolute: Vec<Regex>,
    connector: Regex,
    lead_in: Regex,
    task_filler: Regex,
    bare_task: Regex,
    bare_to: Regex,
    determiner: Regex,
    leading_time: Regex,
    trailing_time: Regex,
}

impl IntentPatterns {
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            delete: compile(DELETE_PATTERNS)?,
            delete_verb: Regex::new(
                r"^(?:delete|remove|cancel|clear|erase|forget(?:\s+about)?)\b(?:\s+(?P<rest>.*))?$",
            )?,
            mark_done: compile(MARK_DONE_PATTERNS)?,
            list: compile(LIST_PATTERNS)?,
            relative: compile(RELATIVE_PATTERNS)?,
            absolute: compile(ABSOLUTE_PATTERNS)?,
            connector: Regex::new(r"\s+(?:at|on|by)\b\s*")?,
            lead_in: Regex::new(
                r"^(?:remind me to|remind me|set task for|set a reminder to|i need to|i have to|i must|don't forget to|remember to)\s+",
            )?,
            task_filler: Regex::new(r"^(?:my|the)\s+task\b\s*")?,
            bare_task: Regex::new(r"^task\b\s*")?,
            bare_to: Regex::new(r"^to\b\s*")?,
            determiner: Regex::new(r"^(?:my|the)\s+")?,
            leading_time: Regex::new(r"^(?:at|on|by|for)\s+(?P<time>.+)$")?,
            trailing_time: Regex::new(r"\s+(?:at|on|by|for)\s+.*$")?,
        })
    }

    /// Strip "my task"/"the task", a bare "task" and a leading determiner;
    /// an empty result becomes the placeholder target.
    fn clean_target(&self, raw: &str) -> String {
        let target = raw.trim();
        let target = self.task_filler.replace(target, "");
        let target = self.bare_task.replace(target.trim(), "");
        let target = self.determiner.replace(target.trim(), "");
        let target = target.trim();
        if target.is_empty() {
            PLACEHOLDER_TASK.to_string()
        } else {
            target.to_string()
        }
    }

    /// Drop a trailing "at/on/by/for ..." clause. A target that is nothing
    /// but a time clause ("at 5") is emptied; "on call shift" is kept.
    fn strip_time_clause(&self, raw: &str) -> String {
        let target = self.trailing_time.replace(raw.trim(), "");
        let is_only_time = self
            .leading_time
            .captures(&target)
            .is_some_and(|caps| normalize_time(&caps["time"]).is_some());
        if is_only_time {
            String::new()
        } else {
            target.into_owned()
        }
    }

    /// Task text of an add command without lead-ins such as "i need to"
    fn clean_add_task(&self, raw: &str) -> String {
        let task = self.lead_in.replace(raw.trim(), "");
        let task = self.bare_to.replace(task.trim(), "");
        format_task_text(&task)
    }

    pub fn match_delete(&self, text: &str) -> Option<ParsedCommand> {
        for pattern in &self.delete {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let raw = caps.name("target").map_or("", |m| m.as_str());
            let task = format_task_text(&self.clean_target(&self.strip_time_clause(raw)));
            trace!("Delete pattern '{}' matched", pattern.as_str());
            debug!("Parsed delete command for '{}'", task);
            return Some(ParsedCommand::DeleteTask { task });
        }
        None
    }

    pub fn looks_like_delete(&self, text: &str) -> bool {
        self.delete_verb.is_match(text)
    }

    /// Best-effort delete for utterances that start with a delete verb but
    /// fit no delete pattern, so they can never be read as an add.
    pub fn fallback_delete(&self, text: &str) -> Option<ParsedCommand> {
        let caps = self.delete_verb.captures(text)?;
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        let task = format_task_text(&self.clean_target(&self.strip_time_clause(rest)));
        debug!("Fallback delete target '{}'", task);
        Some(ParsedCommand::DeleteTask { task })
    }

    pub fn match_mark_done(&self, text: &str) -> Option<ParsedCommand> {
        for pattern in &self.mark_done {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let raw = caps.name("target").map_or("", |m| m.as_str()).trim();
            // "mark as done" names no task
            if raw == "as" {
                continue;
            }
            let task = format_task_text(&self.clean_target(raw));
            debug!("Parsed mark-done command for '{}'", task);
            return Some(ParsedCommand::MarkDone { task });
        }
        None
    }

    pub fn is_list_tasks(&self, text: &str) -> bool {
        self.list.iter().any(|pattern| pattern.is_match(text))
    }

    /// "<task> in 10 minutes", "remind me to <task> after two hours"
    pub fn match_relative_time(&self, text: &str, now: NaiveDateTime) -> Option<ParsedCommand> {
        let converted = convert_number_words(text);

        for pattern in &self.relative {
            let Some(caps) = pattern.captures(&converted) else {
                continue;
            };
            let Some(amount) = caps.name("amount").and_then(|m| m.as_str().parse::<u32>().ok())
            else {
                continue;
            };
            let Some(unit) = caps.name("unit").and_then(|m| TimeUnit::from_word(m.as_str())) else {
                continue;
            };
            let task = self.clean_add_task(caps.name("task").map_or("", |m| m.as_str()));
            if task.is_empty() {
                continue;
            }

            if let Some(time) = relative_time(now, amount, unit) {
                debug!("Parsed relative time: task='{}', {} {:?} -> {}", task, amount, unit, time);
                return Some(ParsedCommand::AddTask { task, time });
            }
        }
        None
    }

    /// "<lead-in> <task> at/on/by <time>"
    ///
    /// A pattern whose time phrase does not normalize counts as no match.
    /// When the task itself contains "at"/"on"/"by", earlier splits are
    /// tried before giving up on the pattern.
    pub fn match_absolute_time(&self, text: &str) -> Option<ParsedCommand> {
        for pattern in &self.absolute {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            for (raw_task, raw_time) in self.absolute_candidates(text, &caps) {
                let task = self.clean_add_task(raw_task);
                if task.is_empty() {
                    continue;
                }
                if let Some(time) = normalize_time(raw_time) {
                    debug!("Parsed add command: task='{}', time='{}'", task, time);
                    return Some(ParsedCommand::AddTask { task, time });
                }
                trace!("Time phrase '{}' did not normalize", raw_time);
            }
        }
        None
    }

    fn absolute_candidates<'t>(
        &self,
        text: &'t str,
        caps: &Captures<'t>,
    ) -> Vec<(&'t str, &'t str)> {
        let Some((task, time)) = task_and_time(caps) else {
            return Vec::new();
        };

        let mut candidates = vec![(task.as_str(), time.as_str())];
        let splits: Vec<_> = self.connector.find_iter(task.as_str()).collect();
        for split in splits.into_iter().rev() {
            let task_end = task.start() + split.start();
            let time_start = task.start() + split.end();
            candidates.push((&text[task.start()..task_end], &text[time_start..time.end()]));
        }
        candidates
    }
}

/// Task and time groups of an add pattern; unnamed variants use their last two groups
fn task_and_time<'t>(caps: &Captures<'t>) -> Option<(Match<'t>, Match<'t>)> {
    if let (Some(task), Some(time)) = (caps.name("task"), caps.name("time")) {
        return Some((task, time));
    }
    let groups: Vec<Match<'t>> = caps.iter().skip(1).flatten().collect();
    match groups.as_slice() {
        [.., task, time] => Some((*task, *time)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn patterns() -> IntentPatterns {
        IntentPatterns::compile().unwrap()
    }

    fn two_pm() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(14, 0, 0).unwrap()
    }

    fn delete(task: &str) -> Option<ParsedCommand> {
        Some(ParsedCommand::DeleteTask { task: task.to_string() })
    }

    fn done(task: &str) -> Option<ParsedCommand> {
        Some(ParsedCommand::MarkDone { task: task.to_string() })
    }

    fn add(task: &str, time: &str) -> Option<ParsedCommand> {
        Some(ParsedCommand::AddTask { task: task.to_string(), time: time.parse().unwrap() })
    }

    #[test_case("delete my meeting task", "Meeting")]
    #[test_case("delete the doctor appointment", "Doctor Appointment")]
    #[test_case("remove task for walk", "Walk")]
    #[test_case("cancel lunch at 5 pm", "Lunch")]
    #[test_case("delete task at 5", "Task")]
    #[test_case("delete the task", "Task")]
    #[test_case("delete my task", "Task")]
    #[test_case("erase call john", "Call John")]
    #[test_case("i want to cancel the task for lunch at noon", "Lunch")]
    #[test_case("could we remove the pills task", "Pills")]
    #[test_case("forget about the dentist", "Dentist")]
    #[test_case("delete on call shift", "On Call shift")]
    #[test_case("cancel the meeting at 10 on friday", "Meeting")]
    fn test_match_delete(text: &str, expected: &str) {
        assert_eq!(patterns().match_delete(text), delete(expected));
    }

    #[test]
    fn test_match_delete_declines_other_text() {
        assert_eq!(patterns().match_delete("show my tasks"), None);
        assert_eq!(patterns().match_delete("remind me to walk at 3 pm"), None);
    }

    #[test]
    fn test_fallback_delete() {
        let patterns = patterns();
        assert!(patterns.looks_like_delete("forget the pills"));
        assert!(patterns.looks_like_delete("delete"));
        assert!(!patterns.looks_like_delete("deleted items"));
        assert_eq!(patterns.fallback_delete("forget the pills"), delete("Pills"));
        assert_eq!(patterns.fallback_delete("delete"), delete("Task"));
        assert_eq!(patterns.fallback_delete("clear my task for dinner on friday"), delete("Task"));
        assert_eq!(patterns.fallback_delete("show my tasks"), None);
    }

    #[test_case("mark medicine as done", "Medicine")]
    #[test_case("mark my pills done", "Pills")]
    #[test_case("done with my walk", "Walk")]
    #[test_case("finished the crossword", "Crossword")]
    #[test_case("task call david is done", "Call David")]
    #[test_case("reminder lunch completed", "Lunch")]
    #[test_case("mark task as done", "Task")]
    #[test_case("mark breakfast done", "Breakfast")]
    fn test_match_mark_done(text: &str, expected: &str) {
        assert_eq!(patterns().match_mark_done(text), done(expected));
    }

    #[test_case("mark as done")]
    #[test_case("set as completed")]
    fn test_match_mark_done_needs_a_target(text: &str) {
        assert_eq!(patterns().match_mark_done(text), None);
    }

    #[test_case("show my tasks", true)]
    #[test_case("what do i have scheduled", true)]
    #[test_case("what do i have to buy at 5 pm", false)]
    #[test_case("list all tasks", true)]
    #[test_case("tell me my tasks", true)]
    #[test_case("read my reminders", true)]
    #[test_case("what are the tasks", true)]
    #[test_case("show all my tasks", true)]
    #[test_case("what do i have today", true)]
    #[test_case("what's scheduled", true)]
    #[test_case("what is on my schedule", true)]
    #[test_case("show me the way", false)]
    #[test_case("random gibberish text", false)]
    fn test_is_list_tasks(text: &str, expected: bool) {
        assert_eq!(patterns().is_list_tasks(text), expected);
    }

    #[test_case("take medicine in 10 minutes", "Take Medicine", "2:10 PM")]
    #[test_case("take medicine in ten minutes", "Take Medicine", "2:10 PM")]
    #[test_case("remind me to call mom in 2 hours", "Call Mom", "4:00 PM")]
    #[test_case("set task for stretching after 45 mins", "Stretching", "2:45 PM")]
    #[test_case("check the oven in one hour", "Check the oven", "3:00 PM")]
    #[test_case("i need to rest in 30 minutes", "Rest", "2:30 PM")]
    fn test_match_relative_time(text: &str, task: &str, time: &str) {
        assert_eq!(patterns().match_relative_time(text, two_pm()), add(task, time));
    }

    #[test]
    fn test_match_relative_time_needs_a_task() {
        assert_eq!(patterns().match_relative_time("in 10 minutes", two_pm()), None);
        assert_eq!(patterns().match_relative_time("walk in the park", two_pm()), None);
    }

    #[test_case("remind me to walk the dog at 3 pm", "Walk the dog", "3:00 PM")]
    #[test_case("i need to see the doctor at 10:30 am", "See the Doctor", "10:30 AM")]
    #[test_case("remember to water plants at seven pm", "Water plants", "7:00 PM")]
    #[test_case("i must call sarah by noon", "Call Sarah", "12:00 PM")]
    #[test_case("remind me lunch at 18:35", "Lunch", "6:35 PM")]
    #[test_case("don't forget to lock the door at 9 o'clock", "Lock the door", "9:00 AM")]
    #[test_case("remind me to turn on the oven at 5 pm", "Turn on the oven", "5:00 PM")]
    #[test_case("remind me to go to bed at 10 pm on time", "Go to bed", "10:00 PM")]
    #[test_case("task pay rent at 8 in the morning", "Pay rent", "8:00 AM")]
    fn test_match_absolute_time(text: &str, task: &str, time: &str) {
        assert_eq!(patterns().match_absolute_time(text), add(task, time));
    }

    #[test]
    fn test_match_absolute_time_rejects_unknown_times() {
        assert_eq!(patterns().match_absolute_time("remind me to walk at the park"), None);
        assert_eq!(patterns().match_absolute_time("walk the dog at 3 pm"), None);
    }

    #[test]
    fn test_match_absolute_time_strips_filler() {
        let patterns = patterns();
        assert_eq!(patterns.match_absolute_time("remind me to at 3 pm"), None);
        assert_eq!(
            patterns.match_absolute_time("remind me to to walk the dog at 3 pm"),
            add("Walk the dog", "3:00 PM")
        );
        assert_eq!(patterns.match_absolute_time("i have to buy at 5 pm"), add("Buy", "5:00 PM"));
    }

    #[test]
    fn test_task_and_time_falls_back_to_last_groups() {
        let regex = Regex::new(r"(remind me to) (.+) at (.+)").unwrap();
        let caps = regex.captures("remind me to eat at 1 pm").unwrap();
        let (task, time) = task_and_time(&caps).unwrap();
        assert_eq!((task.as_str(), time.as_str()), ("eat", "1 pm"));
    }
}
