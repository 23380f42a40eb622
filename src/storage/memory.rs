use super::{StoreError, Task, TaskList, TaskStore};
use crate::parser::ClockTime;

/// Tasks held in memory only, lost on exit
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    list: TaskList,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryTaskStore {
    fn add_task(&mut self, title: &str, due_time: ClockTime) -> Result<Task, StoreError> {
        self.list.push(title, due_time)
    }

    fn get_all_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.list.sorted())
    }

    fn delete_task(&mut self, id: u64) -> Result<bool, StoreError> {
        Ok(self.list.remove(id))
    }

    fn mark_done(&mut self, id: u64) -> Result<bool, StoreError> {
        Ok(self.list.complete(id))
    }

    fn clear_all(&mut self) -> Result<usize, StoreError> {
        Ok(self.list.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_lifecycle() {
        let mut store = MemoryTaskStore::new();
        let walk = store.add_task("Walk", "3:00 PM".parse().unwrap()).unwrap();
        store.add_task("Breakfast", "8:00 AM".parse().unwrap()).unwrap();

        let tasks = store.get_all_tasks().unwrap();
        assert_eq!(tasks[0].title, "Breakfast");
        assert_eq!(tasks[1].title, "Walk");

        assert!(store.mark_done(walk.id).unwrap());
        assert!(store.get_all_tasks().unwrap()[1].is_completed);

        assert!(store.delete_task(walk.id).unwrap());
        assert!(!store.delete_task(walk.id).unwrap());
        assert_eq!(store.clear_all().unwrap(), 1);
        assert!(store.get_all_tasks().unwrap().is_empty());
    }

    #[test]
    fn test_deleted_id_is_not_handed_out_again() {
        let mut store = MemoryTaskStore::new();
        let walk = store.add_task("Walk", "3:00 PM".parse().unwrap()).unwrap();
        store.delete_task(walk.id).unwrap();
        let nap = store.add_task("Nap", "3:00 PM".parse().unwrap()).unwrap();
        assert_ne!(nap.id, walk.id);
    }
}
