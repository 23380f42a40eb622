//! Task storage
//!
//! The interpreter never touches storage directly; the command processor and
//! the alarm monitor go through [`TaskStore`].

mod json;
mod memory;

pub use json::JsonTaskStore;
pub use memory::MemoryTaskStore;

use crate::parser::ClockTime;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Maximum allowed size of a task file (10MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// Maximum number of tasks kept in one store
pub const MAX_TASKS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub due_time: ClockTime,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Key identifying one scheduled ring of this task
    pub fn alarm_key(&self) -> String {
        format!("{}_{}", self.id, self.due_time)
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to read task data: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("task file exceeds security limit of {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("too many tasks (maximum {limit})")]
    TooManyItems { limit: usize },
}

/// Persistence collaborator for tasks
pub trait TaskStore: Send {
    fn add_task(&mut self, title: &str, due_time: ClockTime) -> Result<Task, StoreError>;

    /// All tasks, ordered by time of day
    fn get_all_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Returns false when no task has `id`
    fn delete_task(&mut self, id: u64) -> Result<bool, StoreError>;

    /// Returns false when no task has `id`
    fn mark_done(&mut self, id: u64) -> Result<bool, StoreError>;

    /// Remove every task, returning how many were removed
    fn clear_all(&mut self) -> Result<usize, StoreError>;
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn add_task(&mut self, title: &str, due_time: ClockTime) -> Result<Task, StoreError> {
        (**self).add_task(title, due_time)
    }

    fn get_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        (**self).get_all_tasks()
    }

    fn delete_task(&mut self, id: u64) -> Result<bool, StoreError> {
        (**self).delete_task(id)
    }

    fn mark_done(&mut self, id: u64) -> Result<bool, StoreError> {
        (**self).mark_done(id)
    }

    fn clear_all(&mut self) -> Result<usize, StoreError> {
        (**self).clear_all()
    }
}

/// Tasks plus the id counter, as kept in memory and written to disk
///
/// `next_id` only ever grows, so an id is never handed out twice even after
/// the newest task is deleted or the list is cleared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TaskList {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl TaskList {
    /// Adopt tasks written without a counter
    fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { next_id: 0, tasks }
    }

    fn push(&mut self, title: &str, due_time: ClockTime) -> Result<Task, StoreError> {
        if self.tasks.len() >= MAX_TASKS {
            return Err(StoreError::TooManyItems { limit: MAX_TASKS });
        }
        let after_existing = self.tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        let id = self.next_id.max(after_existing);
        self.next_id = id + 1;

        let task = Task {
            id,
            title: title.to_string(),
            due_time,
            created_at: Local::now(),
            is_completed: false,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn sorted(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        tasks.sort_by(|a, b| a.due_time.cmp(&b.due_time).then(a.id.cmp(&b.id)));
        tasks
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    fn complete(&mut self, id: u64) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.is_completed = true;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }
}
