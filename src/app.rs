use crate::alarm::{announcement, AlarmMonitor, DailyReset};
use crate::command_processor::{CommandProcessor, Response};
use crate::config::Config;
use crate::parser::CommandParser;
use crate::storage::TaskStore;
use anyhow::{anyhow, Result};
use chrono::{Duration, Local, NaiveDateTime};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::{Arc, Mutex, MutexGuard};

/// Everything one utterance or alarm tick may touch, behind a single lock
pub struct Assistant {
    processor: CommandProcessor<Box<dyn TaskStore>>,
    monitor: AlarmMonitor,
    reset: DailyReset,
    daily_reset: bool,
}

impl Assistant {
    pub fn new(
        config: &Config,
        parser: CommandParser,
        store: Box<dyn TaskStore>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            processor: CommandProcessor::new(parser, store),
            monitor: AlarmMonitor::new(Duration::minutes(config.alarm.nag_minutes)),
            reset: DailyReset::starting(now.date()),
            daily_reset: config.alarm.daily_reset,
        }
    }

    pub fn processor(&mut self) -> &mut CommandProcessor<Box<dyn TaskStore>> {
        &mut self.processor
    }

    /// One alarm poll: the daily reset, then new and repeated alarms.
    /// Returns the announcements to speak.
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<Vec<String>> {
        if self.daily_reset {
            if let Some(cleared) =
                self.reset.reset_if_new_day(self.processor.store_mut(), now.date())?
            {
                self.monitor.clear();
                log::info!("Fresh start for {}: {} tasks cleared", now.date(), cleared);
            }
        }

        let tasks = self.processor.store().get_all_tasks()?;
        let mut ringing = self.monitor.due_tasks(&tasks, now);
        ringing.extend(self.monitor.nag_due(now));
        Ok(ringing.iter().map(announcement).collect())
    }

    /// Acknowledge every ringing alarm
    pub fn dismiss(&mut self) -> Result<String> {
        let dismissed = self.monitor.dismiss_all(self.processor.store_mut())?;
        Ok(match dismissed.as_slice() {
            [] => "No alarms are ringing".to_string(),
            [task] => format!("Task Done: {}", task.title),
            tasks => format!("Dismissed {} alarms", tasks.len()),
        })
    }
}

pub struct Application {
    assistant: Arc<Mutex<Assistant>>,
    poll_seconds: u64,
}

impl Application {
    pub fn new(config: &Config, parser: CommandParser, store: Box<dyn TaskStore>) -> Self {
        let assistant = Assistant::new(config, parser, store, Local::now().naive_local());
        Self {
            assistant: Arc::new(Mutex::new(assistant)),
            poll_seconds: config.alarm.poll_seconds.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Assistant>> {
        lock(&self.assistant)
    }

    /// Run a single utterance
    pub fn say(&self, utterance: &str) -> Result<Response> {
        self.lock()?.processor().handle(utterance)
    }

    pub async fn run(&self) -> Result<()> {
        log::info!("Starting Voxtask");

        let alarm_handle = tokio::spawn(alarm_loop(self.assistant.clone(), self.poll_seconds));

        let assistant = self.assistant.clone();
        let result = tokio::task::spawn_blocking(move || terminal_loop(&assistant)).await;

        alarm_handle.abort();
        result.map_err(|e| anyhow!("Terminal task failed: {}", e))?
    }
}

fn lock(assistant: &Mutex<Assistant>) -> Result<MutexGuard<'_, Assistant>> {
    assistant.lock().map_err(|_| anyhow!("Task state lock poisoned"))
}

/// One alarm poll on a blocking thread; the lock and the store I/O stay off
/// the async workers.
async fn run_tick(assistant: Arc<Mutex<Assistant>>, now: NaiveDateTime) -> Result<Vec<String>> {
    tokio::task::spawn_blocking(move || {
        let mut state = lock(&assistant)?;
        state.tick(now)
    })
    .await
    .map_err(|e| anyhow!("Alarm tick failed: {}", e))?
}

async fn alarm_loop(assistant: Arc<Mutex<Assistant>>, poll_seconds: u64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(poll_seconds));
    loop {
        interval.tick().await;
        match run_tick(assistant.clone(), Local::now().naive_local()).await {
            Ok(announcements) => {
                for text in announcements {
                    println!("\n⏰ {}  (type 'dismiss' when done)", text);
                }
            }
            Err(e) => log::error!("Alarm monitor error: {:?}", e),
        }
    }
}

fn terminal_loop(assistant: &Mutex<Assistant>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Welcome to Voxtask! Say what you need, or type 'help'.");
    println!("Example: remind me to take medicine at 8 pm");

    let prompt = "🎙  ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match process_line(assistant, &line) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break,
                    Err(err) => log::error!("Failed to process command: {:?}", err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

fn process_line(assistant: &Mutex<Assistant>, line: &str) -> Result<Flow> {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(Flow::Exit),
        "help" => {
            print_help();
            return Ok(Flow::Continue);
        }
        "dismiss" | "stop" => {
            println!("{}", lock(assistant)?.dismiss()?);
            return Ok(Flow::Continue);
        }
        _ => {}
    }

    // "add <time> <title>" bypasses the interpreter
    if let Some(rest) = trimmed.strip_prefix("add ") {
        let (time, title) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
        match lock(assistant)?.processor().add_manual_task(title, time) {
            Ok(reply) => println!("{}", reply),
            Err(e) => println!("Could not add task: {}", e),
        }
        return Ok(Flow::Continue);
    }

    let response = lock(assistant)?.processor().handle(trimmed)?;
    if response != Response::Silence {
        println!("{}", response);
    }
    Ok(Flow::Continue)
}

fn print_help() {
    println!("Things you can say:");
    println!("  remind me to walk the dog at 3 PM");
    println!("  take medicine in 10 minutes");
    println!("  show my tasks");
    println!("  mark medicine as done");
    println!("  delete my meeting task");
    println!("Other commands:");
    println!("  add <time> <title>  - add a task without interpretation, e.g. add 4:30pm visit grandma");
    println!("  dismiss             - acknowledge ringing alarms");
    println!("  exit                - leave Voxtask");
}
