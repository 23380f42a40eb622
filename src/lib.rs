pub mod alarm;
pub mod app;
pub mod cli;
pub mod command_processor;
pub mod config;
pub mod parser;
pub mod storage;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use log::info;
use std::io::Write;

// Re-export commonly used types
pub use command_processor::{CommandProcessor, Response};
pub use config::Config;
pub use parser::{ClockTime, CommandParser, ParsedCommand, Parser, ParserConfig};
pub use storage::{JsonTaskStore, MemoryTaskStore, Task, TaskStore};

pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let parser = CommandParser::new(&ParserConfig::from(&config))
        .context("Failed to build command interpreter")?;

    match &cli.command {
        Some(command @ Commands::Parse { .. }) => {
            let parsed = parser.parse_command(&command.utterance());
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
        Some(command @ Commands::Say { .. }) => {
            let store = open_store(&cli, &config)?;
            let app = app::Application::new(&config, parser, store);
            let response = app.say(&command.utterance())?;
            println!("{}", response);
            Ok(())
        }
        None => {
            let store = open_store(&cli, &config)?;
            info!("Initializing Voxtask application");
            app::Application::new(&config, parser, store).run().await
        }
    }
}

/// Pick the task store from the command line and configuration
pub fn open_store(cli: &Cli, config: &Config) -> Result<Box<dyn TaskStore>> {
    if cli.ephemeral {
        info!("Using in-memory task store");
        return Ok(Box::new(MemoryTaskStore::new()));
    }

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => config.data_dir()?,
    };
    let store = JsonTaskStore::open(&data_dir)
        .with_context(|| format!("Failed to open task store in {}", data_dir.display()))?;
    info!("Using task file {}", store.path().display());
    Ok(Box::new(store))
}

/// Timestamped logging, `info` unless `RUST_LOG` says otherwise
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
