//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{task, tui};
use crate::domain::Filter;
use crate::logging::{init_logging, LogTarget};
use crate::storage::{Config, Slot, TaskStore};

#[derive(Parser)]
#[command(name = "daylist")]
#[command(author, version, about = "Local-first task list for the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to use instead of the configured one
    #[arg(long, global = true, env = "DAYLIST_FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file to read
    #[arg(long, global = true, env = "DAYLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run (opens the interactive list when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive task list
    Tui,

    /// Add a task
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List tasks
    List {
        /// Which tasks to show
        #[arg(long, default_value = "all")]
        filter: Filter,
    },

    /// Mark a task done, or open again
    Toggle {
        /// Task ID
        id: String,
    },

    /// Change a task's text
    Edit {
        /// Task ID
        id: String,

        /// New text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show where tasks and configuration are stored
    Path,
}

/// Everything a command needs: configuration and the resolved task file
pub struct Session {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub data_file: PathBuf,
}

impl Session {
    fn resolve(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().or_else(Config::default_path);
        let config = Config::load(config_path.as_deref())?;
        let data_file = config.resolve_data_file(cli.file.as_deref())?;
        tracing::debug!(data_file = %data_file.display(), "resolved task file");

        Ok(Self {
            config,
            config_path,
            data_file,
        })
    }

    /// Opens the task store, reporting an unreadable task file as a warning
    pub fn open_store(&self, output: &Output) -> Result<TaskStore> {
        let store = TaskStore::open(Slot::new(&self.data_file))?;
        if let Some(warning) = store.load_warning() {
            output.warning(warning);
        }
        Ok(store)
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format);

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    let target = if interactive {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    // Held until the command finishes so buffered log lines are flushed
    let _log_guard = match init_logging(target, cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            output.warning(&format!("Logging disabled: {:#}", e));
            None
        }
    };

    let session = Session::resolve(&cli)?;

    match cli.command {
        None | Some(Commands::Tui) => tui::run(&session)?,
        Some(Commands::Add { text }) => task::add(&session, &output, &text.join(" "))?,
        Some(Commands::List { filter }) => task::list(&session, &output, filter)?,
        Some(Commands::Toggle { id }) => task::toggle(&session, &output, &id)?,
        Some(Commands::Edit { id, text }) => task::edit(&session, &output, &id, &text.join(" "))?,
        Some(Commands::Rm { id, yes }) => task::remove(&session, &output, &id, yes)?,
        Some(Commands::Path) => show_paths(&session, &output),
    }

    tracing::debug!("command completed");
    Ok(())
}

fn show_paths(session: &Session, output: &Output) {
    let config = session
        .config_path
        .as_ref()
        .map(|p| p.display().to_string());

    if output.is_json() {
        output.data(&serde_json::json!({
            "data_file": session.data_file.display().to_string(),
            "config_file": config,
        }));
    } else {
        println!("Tasks:  {}", session.data_file.display());
        println!("Config: {}", config.as_deref().unwrap_or("(none)"));
    }
}
