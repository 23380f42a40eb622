//! Parser traits module
//!
//! Defines the structured result of interpreting an utterance and the
//! interface every command interpreter implements.

use crate::parser::time::ClockTime;
use serde::{Deserialize, Serialize};

/// A recognised command. "No match" is represented by `None` at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParsedCommand {
    AddTask { task: String, time: ClockTime },
    DeleteTask { task: String },
    MarkDone { task: String },
    ListTasks,
}

impl ParsedCommand {
    /// Wire name of the intent, e.g. `ADD_TASK`
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedCommand::AddTask { .. } => "ADD_TASK",
            ParsedCommand::DeleteTask { .. } => "DELETE_TASK",
            ParsedCommand::MarkDone { .. } => "MARK_DONE",
            ParsedCommand::ListTasks => "LIST_TASKS",
        }
    }

    /// Task text carried by the command, if any
    pub fn task(&self) -> Option<&str> {
        match self {
            ParsedCommand::AddTask { task, .. }
            | ParsedCommand::DeleteTask { task }
            | ParsedCommand::MarkDone { task } => Some(task),
            ParsedCommand::ListTasks => None,
        }
    }
}

/// Interpreter for a single finalized utterance
pub trait Parser: Send + Sync {
    /// Interpret `input`, returning `None` when no command is recognised.
    fn parse(&self, input: &str) -> Option<ParsedCommand>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_with_type_tag() {
        let command = ParsedCommand::AddTask {
            task: "Walk the dog".to_string(),
            time: "3:00 PM".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            serde_json::json!({"type": "ADD_TASK", "task": "Walk the dog", "time": "3:00 PM"})
        );
        assert_eq!(
            serde_json::to_value(ParsedCommand::ListTasks).unwrap(),
            serde_json::json!({"type": "LIST_TASKS"})
        );
    }

    #[test]
    fn test_deserializes_from_type_tag() {
        let command: ParsedCommand =
            serde_json::from_str(r#"{"type": "MARK_DONE", "task": "Medicine"}"#).unwrap();
        assert_eq!(command, ParsedCommand::MarkDone { task: "Medicine".to_string() });
        assert_eq!(command.kind(), "MARK_DONE");
        assert_eq!(command.task(), Some("Medicine"));
    }
}
