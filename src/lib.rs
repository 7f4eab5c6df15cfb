//! # `todo_keeper`
//!
//! A todo list kept under a single key of a key-value backend, with
//! two-step confirmation for the destructive operations.
//!
//! The [`todos`] module holds the domain: items, the [`TodoStore`] that
//! loads and saves them, and the [`todos::TodoBoard`] that tracks the
//! filter, edit form, and pending confirmation a front end needs.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod render;
pub mod storage;
pub mod templates;
pub mod todos;
pub mod traits;

pub use error::{Error, Result};
pub use storage::{MemoryStore, SqliteStore};
pub use todos::{NewTodo, Status, StatusFilter, TodoItem, TodoStore, TodoUpdate};
pub use traits::{KeyValueStore, Prompter};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
