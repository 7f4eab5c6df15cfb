//! Todo list management.
//!
//! This module provides:
//! - Todos with title, rich-text description, and lifecycle status
//! - A store that persists the whole list under one key of a key-value backend
//! - Two-phase confirmation for deleting and completing todos
//! - A board that keeps filter, form, and confirmation state for a UI
//!
//! # Example
//!
//! ```
//! use todo_keeper::todos::{NewTodo, Status, StatusFilter, TodoBoard, TodoStore};
//!
//! let mut store = TodoStore::in_memory();
//! let todo = store.add(NewTodo::titled("Buy milk")).unwrap();
//!
//! let mut board = TodoBoard::new(store);
//! board.request_complete(todo.id);
//! board.confirm();
//!
//! let done = board.store().filter(StatusFilter::Only(Status::Completed));
//! assert_eq!(done.len(), 1);
//! ```

pub mod board;
pub mod id;
pub mod models;
pub mod pending;
pub mod store;

pub use board::{Resolution, TodoBoard, TodoForm, EMPTY_BOARD_MESSAGE, NO_MATCH_MESSAGE};
pub use models::{InvalidStatus, NewTodo, Status, StatusFilter, TodoItem, TodoUpdate};
pub use pending::{Action, PendingAction};
pub use store::{TodoStore, DEFAULT_STORAGE_KEY};
