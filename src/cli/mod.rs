//! Command-line interface for todo-keeper.
//!
//! The binary is a thin wrapper: it parses [`Cli`], installs logging, and
//! hands the command to [`run`], which returns everything to print.

mod run;


pub use run::{run, CliOutput, StdinPrompter};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Todo list manager.
///
/// Todos are kept in the storage backend chosen by
/// `.todo-keeper/config.yaml` (run `todo-keeper ensure-config` to create one).
/// Deleting or completing a todo asks for confirmation unless `--yes` is given.
#[derive(Parser, Debug)]
#[command(name = "todo-keeper")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory holding `.todo-keeper/config.yaml`
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a todo.
    Add {
        /// Title (required)
        #[arg(short, long)]
        title: String,

        /// Description; HTML is allowed
        #[arg(short, long, default_value = "")]
        description: String,

        /// Status: todo, starting-soon, in-progress, in-qa
        #[arg(short, long, default_value = "todo")]
        status: String,
    },

    /// Edit a todo that is not completed.
    ///
    /// Only specified fields change.
    Edit {
        /// Todo ID
        id: i64,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New status: todo, starting-soon, in-progress, in-qa
        #[arg(short, long)]
        status: Option<String>,
    },

    /// List todos, optionally filtered by status.
    List {
        /// Filter: all, todo, starting-soon, in-progress, in-qa, completed
        #[arg(short, long, default_value = "all")]
        status: String,
    },

    /// Show one todo.
    Show {
        /// Todo ID
        id: i64,
    },

    /// Mark a todo completed. It can no longer be edited afterwards.
    Complete {
        /// Todo ID
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a todo.
    Delete {
        /// Todo ID
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the stored todo list as JSON.
    Export,

    /// Ensure config file exists (create with defaults if not).
    #[command(name = "ensure-config")]
    EnsureConfig,

    /// Show version information.
    Version,
}
