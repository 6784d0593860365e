//! Todos CLI - manage named to-do lists from the command line

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todos::commands;
use todos::config::{self, LocationOverrides, TodosConfig};
use todos::output::{emit_error, OutputMode};
use todos::storage::{with_store, BackendKind, Store, StoreLocation};
use todos::{ListId, TodoId};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "todos")]
#[command(version)]
#[command(about = "Named to-do lists backed by SQLite or a session file")]
#[command(long_about = r#"
Todos keeps named lists of items you can add, check off and remove.

Example usage:
  todos new-list "Groceries"
  todos add 1 "Milk"
  todos check 1 1
  todos lists
  todos --backend session show 0
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (sqlite, session)
    #[arg(short, long, global = true)]
    backend: Option<BackendKind>,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the session state file
    #[arg(short, long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file using the current backend settings
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    #[command(flatten)]
    Store(StoreCommand),
}

/// Commands that run against an opened store
#[derive(Subcommand)]
enum StoreCommand {
    /// Show every list with its progress
    Lists,

    /// Show one list and its todos
    Show {
        /// List id
        list: ListId,
    },

    /// Create a new list
    NewList {
        /// List name (1-100 characters)
        name: String,
    },

    /// Rename a list
    Rename {
        /// List id
        list: ListId,

        /// New list name
        name: String,
    },

    /// Delete a list and all of its todos
    DeleteList {
        /// List id
        list: ListId,
    },

    /// Add a todo to a list
    Add {
        /// List id
        list: ListId,

        /// Todo description
        name: String,
    },

    /// Remove a todo from a list
    Remove {
        /// List id
        list: ListId,

        /// Todo id
        todo: TodoId,
    },

    /// Mark a todo as completed
    Check {
        /// List id
        list: ListId,

        /// Todo id
        todo: TodoId,
    },

    /// Mark a todo as not completed
    Uncheck {
        /// List id
        list: ListId,

        /// Todo id
        todo: TodoId,
    },

    /// Mark every todo in a list as completed
    CompleteAll {
        /// List id
        list: ListId,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    if let Err(e) = run(cli, mode) {
        emit_error(mode, &e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let loaded = config::load_config(cli.config.as_deref())?;
    let overrides = LocationOverrides {
        backend: cli.backend,
        database: cli.database,
        session_file: cli.session_file,
    };
    let location = config::resolve_location(&overrides, loaded.as_ref());
    tracing::debug!("Using {} backend at {}", location.kind(), location.path().display());

    let command = match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            return commands::run_init(mode, &path, &to_config(&location), force);
        }
        Commands::Store(command) => command,
    };

    if let StoreLocation::Sqlite(path) = &location {
        config::ensure_db_dir(path)?;
    }

    with_store(&location, |store| dispatch(store, mode, command))
}

fn dispatch(store: &mut dyn Store, mode: OutputMode, command: StoreCommand) -> anyhow::Result<()> {
    match command {
        StoreCommand::Lists => commands::run_lists(store, mode),
        StoreCommand::Show { list } => commands::run_show(store, mode, list),
        StoreCommand::NewList { name } => commands::run_new_list(store, mode, &name),
        StoreCommand::Rename { list, name } => commands::run_rename(store, mode, list, &name),
        StoreCommand::DeleteList { list } => commands::run_delete_list(store, mode, list),
        StoreCommand::Add { list, name } => commands::run_add_todo(store, mode, list, &name),
        StoreCommand::Remove { list, todo } => commands::run_delete_todo(store, mode, list, todo),
        StoreCommand::Check { list, todo } => commands::run_set_status(store, mode, list, todo, true),
        StoreCommand::Uncheck { list, todo } => commands::run_set_status(store, mode, list, todo, false),
        StoreCommand::CompleteAll { list } => commands::run_complete_all(store, mode, list),
    }
}

fn to_config(location: &StoreLocation) -> TodosConfig {
    let path = Some(location.path().display().to_string());
    match location {
        StoreLocation::Sqlite(_) => TodosConfig {
            backend: Some(BackendKind::Sqlite),
            database: path,
            session_file: None,
        },
        StoreLocation::Session(_) => TodosConfig {
            backend: Some(BackendKind::Session),
            database: None,
            session_file: path,
        },
    }
}
