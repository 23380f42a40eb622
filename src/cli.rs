use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Voxtask - a spoken task reminder for the terminal
#[derive(Debug, Parser)]
#[command(name = "voxtask")]
#[command(about = "Spoken task reminders: add, list, complete and delete tasks in plain words", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive mode)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read configuration from this file instead of the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store tasks in this directory
    #[arg(long = "data-dir", global = true, conflicts_with = "ephemeral")]
    pub data_dir: Option<PathBuf>,

    /// Keep tasks in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show how an utterance is interpreted, as JSON, without touching any tasks
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run a single utterance against the task list and print the reply
    Say {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

impl Commands {
    /// The utterance given on the command line, words joined by single spaces
    pub fn utterance(&self) -> String {
        match self {
            Commands::Parse { text } | Commands::Say { text } => text.join(" "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_subcommand_joins_words() {
        let cli = Cli::try_parse_from(["voxtask", "parse", "show", "my", "tasks"]).unwrap();
        let command = cli.command.unwrap();
        assert!(matches!(command, Commands::Parse { .. }));
        assert_eq!(command.utterance(), "show my tasks");
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["voxtask", "--ephemeral", "say", "show my tasks"]).unwrap();
        assert!(cli.ephemeral);
        assert_eq!(cli.command.unwrap().utterance(), "show my tasks");

        let cli = Cli::try_parse_from(["voxtask", "--data-dir", "/tmp/tasks"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/tasks")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_data_dir_conflicts_with_ephemeral() {
        assert!(Cli::try_parse_from(["voxtask", "--ephemeral", "--data-dir", "x"]).is_err());
        assert!(Cli::try_parse_from(["voxtask", "say"]).is_err());
    }
}
