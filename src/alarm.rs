//! Due-task alarms and the daily fresh start
//!
//! The monitor itself does no timing; the front end calls it from a periodic
//! tick and announces whatever it returns.

use crate::storage::{StoreError, Task, TaskStore};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, info};
use std::collections::HashMap;

pub const DEFAULT_POLL_SECONDS: u64 = 30;
pub const DEFAULT_NAG_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
struct ActiveAlarm {
    task: Task,
    last_announced: NaiveDateTime,
}

/// Tracks which tasks are ringing, keyed `"{id}_{due_time}"`
#[derive(Debug)]
pub struct AlarmMonitor {
    active: HashMap<String, ActiveAlarm>,
    nag_interval: Duration,
}

impl Default for AlarmMonitor {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_NAG_MINUTES))
    }
}

impl AlarmMonitor {
    pub fn new(nag_interval: Duration) -> Self {
        Self { active: HashMap::new(), nag_interval }
    }

    /// Pending tasks due in the minute of `now` that are not already ringing.
    /// Returned tasks become active.
    pub fn due_tasks(&mut self, tasks: &[Task], now: NaiveDateTime) -> Vec<Task> {
        // Alarms for tasks that were deleted or completed elsewhere stop ringing
        self.active.retain(|key, _| {
            tasks.iter().any(|task| !task.is_completed && &task.alarm_key() == key)
        });

        let mut due = Vec::new();
        for task in tasks.iter().filter(|task| !task.is_completed) {
            let key = task.alarm_key();
            if self.active.contains_key(&key) || !task.due_time.matches(now.time()) {
                continue;
            }
            info!("Triggering alarm {}", key);
            self.active.insert(key, ActiveAlarm { task: task.clone(), last_announced: now });
            due.push(task.clone());
        }
        due
    }

    /// Active alarms not dismissed within the nag interval; their timer restarts
    pub fn nag_due(&mut self, now: NaiveDateTime) -> Vec<Task> {
        let mut due = Vec::new();
        for (key, alarm) in self.active.iter_mut() {
            if now - alarm.last_announced >= self.nag_interval {
                debug!("Re-triggering alarm {}", key);
                alarm.last_announced = now;
                due.push(alarm.task.clone());
            }
        }
        due
    }

    pub fn should_retrigger(&self, key: &str) -> bool {
        self.active.contains_key(key)
    }

    /// Acknowledge an alarm: the task is marked done and stops ringing
    pub fn dismiss<S: TaskStore + ?Sized>(
        &mut self,
        store: &mut S,
        task: &Task,
    ) -> Result<bool, StoreError> {
        let key = task.alarm_key();
        self.active.remove(&key);
        let marked = store.mark_done(task.id)?;
        info!("Dismissed alarm {}", key);
        Ok(marked)
    }

    /// Dismiss every ringing alarm, returning the tasks that were marked done
    pub fn dismiss_all<S: TaskStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<Vec<Task>, StoreError> {
        let ringing: Vec<Task> = self.active.values().map(|alarm| alarm.task.clone()).collect();
        for task in &ringing {
            self.dismiss(store, task)?;
        }
        Ok(ringing)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Text spoken when an alarm rings
pub fn announcement(task: &Task) -> String {
    format!("Reminder. {} at {}", task.title, task.due_time)
}

/// Clears every task once per calendar day
#[derive(Debug, Clone, Copy)]
pub struct DailyReset {
    last_reset: NaiveDate,
}

impl DailyReset {
    /// Tasks present at startup are kept; the first reset happens on the next day
    pub fn starting(today: NaiveDate) -> Self {
        Self { last_reset: today }
    }

    pub fn last_reset(&self) -> NaiveDate {
        self.last_reset
    }

    /// Returns the number of cleared tasks when `today` starts a new day
    pub fn reset_if_new_day<S: TaskStore + ?Sized>(
        &mut self,
        store: &mut S,
        today: NaiveDate,
    ) -> Result<Option<usize>, StoreError> {
        if today <= self.last_reset {
            return Ok(None);
        }
        let cleared = store.clear_all()?;
        self.last_reset = today;
        info!("Daily fresh start: cleared {} tasks", cleared);
        Ok(Some(cleared))
    }
}
