use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use test_case::test_case;
use voxtask::parser::{format_task_text, normalize_time};
use voxtask::{CommandParser, ParsedCommand, Parser, ParserConfig};

fn parser() -> CommandParser {
    CommandParser::new(&ParserConfig::default()).unwrap()
}

fn two_pm() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 20).unwrap().and_hms_opt(14, 0, 0).unwrap()
}

#[test_case("10 pm", "10:00 PM")]
#[test_case("noon", "12:00 PM")]
#[test_case("18:35", "6:35 PM")]
#[test_case("ten pm", "10:00 PM")]
#[test_case("10:05 pm", "10:05 PM")]
#[test_case("7 o'clock in the evening", "7:00 PM")]
fn test_time_normalization(phrase: &str, expected: &str) {
    assert_eq!(normalize_time(phrase).map(|t| t.to_string()), Some(expected.to_string()));
}

#[test_case("walk the dog")]
#[test_case("CALL JOHN about the Doctor")]
#[test_case("  visit   grandma, then nap ")]
#[test_case("")]
fn test_format_task_text_is_idempotent(text: &str) {
    let once = format_task_text(text);
    assert_eq!(format_task_text(&once), once);
}

#[test]
fn test_parse_json_shape() {
    let parsed = parser().parse_at("remind me to walk the dog at 3 PM", two_pm());
    assert_eq!(
        serde_json::to_value(parsed).unwrap(),
        serde_json::json!({"type": "ADD_TASK", "task": "Walk the dog", "time": "3:00 PM"})
    );
    let nothing = parser().parse_at("", two_pm());
    assert_eq!(serde_json::to_value(nothing).unwrap(), serde_json::Value::Null);
}

#[test]
fn test_trait_object_parse() {
    let parser: Box<dyn Parser> = Box::new(parser());
    assert_eq!(parser.parse("show my tasks"), Some(ParsedCommand::ListTasks));
    assert_eq!(parser.parse("random gibberish text"), None);
}

#[test]
fn test_shared_between_threads() {
    let parser = std::sync::Arc::new(parser());
    let handles: Vec<_> = ["delete my meeting task", "mark medicine as done"]
        .into_iter()
        .map(|utterance| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.parse_at(utterance, two_pm()))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            Some(ParsedCommand::DeleteTask { task: "Meeting".to_string() }),
            Some(ParsedCommand::MarkDone { task: "Medicine".to_string() }),
        ]
    );
}
