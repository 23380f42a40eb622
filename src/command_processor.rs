//! Applies recognised commands to the task store and phrases the reply
//! that is spoken back to the user.

use crate::parser::help::suggestions_for;
use crate::parser::{ClockTime, CommandParser, ParsedCommand};
use crate::storage::TaskStore;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::{debug, info, warn};
use std::fmt;

/// Reply to one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Spoken(String),
    NotUnderstood { utterance: String, suggestions: &'static [&'static str] },
    /// Nothing was heard
    Silence,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Spoken(text) => f.write_str(text),
            Response::NotUnderstood { utterance, suggestions } => {
                write!(
                    f,
                    "I didn't understand: '{}'. Here are some examples you can try:",
                    utterance
                )?;
                for suggestion in suggestions.iter() {
                    write!(f, "\n  • '{}'", suggestion)?;
                }
                Ok(())
            }
            Response::Silence => Ok(()),
        }
    }
}

pub struct CommandProcessor<S: TaskStore> {
    parser: CommandParser,
    store: S,
}

impl<S: TaskStore> CommandProcessor<S> {
    pub fn new(parser: CommandParser, store: S) -> Self {
        Self { parser, store }
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Interpret and apply one utterance against the local wall clock
    pub fn handle(&mut self, utterance: &str) -> Result<Response> {
        self.handle_at(utterance, Local::now().naive_local())
    }

    pub fn handle_at(&mut self, utterance: &str, now: NaiveDateTime) -> Result<Response> {
        if utterance.trim().is_empty() {
            warn!("Empty voice command received");
            return Ok(Response::Silence);
        }

        match self.parser.parse_at(utterance, now) {
            Some(command) => self.apply(command).map(Response::Spoken),
            None => {
                debug!("Unrecognised utterance: '{}'", utterance);
                Ok(Response::NotUnderstood {
                    utterance: utterance.trim().to_string(),
                    suggestions: suggestions_for(utterance),
                })
            }
        }
    }

    /// Apply a parsed command, returning the text to speak
    pub fn apply(&mut self, command: ParsedCommand) -> Result<String> {
        info!("Executing {} command", command.kind());
        match command {
            ParsedCommand::AddTask { task, time } => self.add_task(&task, time),
            ParsedCommand::DeleteTask { task } => self.delete_task(&task),
            ParsedCommand::MarkDone { task } => self.mark_done(&task),
            ParsedCommand::ListTasks => self.list_tasks(),
        }
    }

    /// Add a task typed in by hand rather than spoken
    pub fn add_manual_task(&mut self, title: &str, time: &str) -> Result<String> {
        let time: ClockTime = time.parse().context("Invalid time for task")?;
        let title = self.parser.format_task_text(title);
        if title.is_empty() {
            anyhow::bail!("Task title cannot be empty");
        }
        self.add_task(&title, time)
    }

    fn add_task(&mut self, title: &str, time: ClockTime) -> Result<String> {
        self.store.add_task(title, time).context("Failed to add task")?;
        Ok(format!("Task added: {} at {}", title, time))
    }

    fn delete_task(&mut self, target: &str) -> Result<String> {
        let tasks = self.store.get_all_tasks().context("Failed to load tasks")?;
        let Some(found) = tasks.into_iter().find(|task| task.title_contains(target)) else {
            return Ok(format!("Could not find task: {}", target));
        };

        self.store.delete_task(found.id).context("Failed to delete task")?;
        Ok(format!("Deleted task: {}", found.title))
    }

    fn mark_done(&mut self, target: &str) -> Result<String> {
        let tasks = self.store.get_all_tasks().context("Failed to load tasks")?;
        let mut marked = 0;
        for task in tasks.iter().filter(|task| task.title_contains(target)) {
            if self.store.mark_done(task.id).context("Failed to mark task as done")? {
                marked += 1;
            }
        }

        if marked == 0 {
            Ok("No matching tasks found to mark as done".to_string())
        } else {
            Ok(format!("Marked {} tasks as done", marked))
        }
    }

    fn list_tasks(&self) -> Result<String> {
        let tasks = self.store.get_all_tasks().context("Failed to load tasks")?;
        let pending: Vec<_> = tasks.iter().filter(|task| !task.is_completed).collect();
        if pending.is_empty() {
            return Ok("You have no tasks.".to_string());
        }

        let mut text = String::from("Here are your tasks: ");
        for (index, task) in pending.iter().enumerate() {
            text.push_str(&format!("Task {}: {} at {}. ", index + 1, task.title, task.due_time));
        }
        Ok(text.trim_end().to_string())
    }
}
