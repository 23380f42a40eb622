use super::{StoreError, Task, TaskList, TaskStore, MAX_FILE_SIZE, MAX_TASKS};
use crate::parser::ClockTime;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const TASKS_FILE: &str = "tasks.json";

/// Tasks persisted as pretty-printed JSON in `<data_dir>/tasks.json`:
/// `{"next_id": 4, "tasks": [...]}`. A bare task array is still read.
///
/// Every operation reloads the file, so separate handles on the same
/// directory see each other's writes.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .map_err(|source| StoreError::Io { path: data_dir.to_path_buf(), source })?;
        Ok(Self { path: data_dir.join(TASKS_FILE) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }

    fn load(&self) -> Result<TaskList, StoreError> {
        if !self.path.exists() {
            return Ok(TaskList::default());
        }

        // Check file size before loading
        let metadata = fs::metadata(&self.path).map_err(|e| self.io_error(e))?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(StoreError::TooLarge { limit: MAX_FILE_SIZE });
        }

        let file = File::open(&self.path).map_err(|e| self.io_error(e))?;
        let json_value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

        let items = json_value.as_array().or_else(|| json_value.get("tasks")?.as_array());
        if items.is_some_and(|items| items.len() > MAX_TASKS) {
            return Err(StoreError::TooManyItems { limit: MAX_TASKS });
        }

        let list = if json_value.is_array() {
            TaskList::from_tasks(serde_json::from_value(json_value)?)
        } else {
            serde_json::from_value(json_value)?
        };
        debug!("Loaded {} tasks from {}", list.tasks.len(), self.path.display());
        Ok(list)
    }

    fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), list)?;
        Ok(())
    }

    fn update<T>(&self, change: impl FnOnce(&mut TaskList) -> T) -> Result<T, StoreError> {
        let mut list = self.load()?;
        let result = change(&mut list);
        self.save(&list)?;
        Ok(result)
    }
}

impl TaskStore for JsonTaskStore {
    fn add_task(&mut self, title: &str, due_time: ClockTime) -> Result<Task, StoreError> {
        self.update(|list| list.push(title, due_time))?
    }

    fn get_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.load()?.sorted())
    }

    fn delete_task(&mut self, id: u64) -> Result<bool, StoreError> {
        self.update(|list| list.remove(id))
    }

    fn mark_done(&mut self, id: u64) -> Result<bool, StoreError> {
        self.update(|list| list.complete(id))
    }

    fn clear_all(&mut self) -> Result<usize, StoreError> {
        self.update(|list| list.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_tasks_survive_reopen() {
        let dir = tempdir().unwrap();
        let mut store = JsonTaskStore::open(dir.path()).unwrap();
        let walk = store.add_task("Walk the dog", "3:00 PM".parse().unwrap()).unwrap();
        store.add_task("Take Medicine", "8:00 AM".parse().unwrap()).unwrap();
        store.mark_done(walk.id).unwrap();

        let reopened = JsonTaskStore::open(dir.path()).unwrap();
        let tasks = reopened.get_all_tasks().unwrap();
        let summary: Vec<_> = tasks
            .iter()
            .map(|t| (t.title.as_str(), t.due_time.to_string(), t.is_completed))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Take Medicine", "8:00 AM".to_string(), false),
                ("Walk the dog", "3:00 PM".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonTaskStore::open(dir.path().join("nested")).unwrap();
        assert!(store.get_all_tasks().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_loose_stored_times_are_accepted() {
        let dir = tempdir().unwrap();
        let store = JsonTaskStore::open(dir.path()).unwrap();
        fs::write(
            store.path(),
            r#"[{"id": 7, "title": "Lunch", "due_time": "12:30pm",
                 "created_at": "2025-06-01T09:00:00+00:00"}]"#,
        )
        .unwrap();

        let tasks = store.get_all_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due_time.to_string(), "12:30 PM");
        assert!(!tasks[0].is_completed);
    }

    #[test]
    fn test_id_counter_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut store = JsonTaskStore::open(dir.path()).unwrap();
        let walk = store.add_task("Walk", "3:00 PM".parse().unwrap()).unwrap();
        store.delete_task(walk.id).unwrap();

        let mut reopened = JsonTaskStore::open(dir.path()).unwrap();
        let nap = reopened.add_task("Nap", "3:00 PM".parse().unwrap()).unwrap();
        assert_eq!((walk.id, nap.id), (1, 2));

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(reopened.path()).unwrap()).unwrap();
        assert_eq!(saved["next_id"], 3);
        assert_eq!(saved["tasks"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_bare_task_array_continues_after_highest_id() {
        let dir = tempdir().unwrap();
        let mut store = JsonTaskStore::open(dir.path()).unwrap();
        fs::write(
            store.path(),
            r#"[{"id": 7, "title": "Lunch", "due_time": "12:30 PM",
                 "created_at": "2025-06-01T09:00:00+00:00"}]"#,
        )
        .unwrap();

        let task = store.add_task("Nap", "2:00 PM".parse().unwrap()).unwrap();
        assert_eq!(task.id, 8);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonTaskStore::open(dir.path()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.get_all_tasks(), Err(StoreError::Serde(_))));
    }

    #[test]
    fn test_clear_all_reports_count() {
        let dir = tempdir().unwrap();
        let mut store = JsonTaskStore::open(dir.path()).unwrap();
        store.add_task("One", "1:00 PM".parse().unwrap()).unwrap();
        store.add_task("Two", "2:00 PM".parse().unwrap()).unwrap();
        assert_eq!(store.clear_all().unwrap(), 2);
        assert_eq!(store.clear_all().unwrap(), 0);
    }
}
