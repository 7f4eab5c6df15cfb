//! The todo store: an ordered todo list persisted under one storage key.

use crate::error::{Error, Result};
use crate::todos::id::{next_todo_id, now_millis};
use crate::todos::models::{NewTodo, Status, StatusFilter, TodoItem, TodoUpdate};
use crate::traits::KeyValueStore;
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Owns the todo list and writes it back after every mutation.
///
/// The backend is injected so callers choose between in-memory and
/// persistent storage. Persistence failures never reach the caller: a failed
/// read yields an empty list and a failed write leaves the in-memory list
/// as the only copy.
pub struct TodoStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    items: Vec<TodoItem>,
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("backend", &self.backend.name())
            .field("key", &self.key)
            .field("items", &self.items.len())
            .finish()
    }
}

impl TodoStore {
    /// Open the store, reading whatever is persisted under `key`.
    pub fn open(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let mut store = Self { backend, key: key.into(), items: Vec::new() };
        store.items = store.load();
        debug!(
            backend = store.backend.name(),
            key = %store.key,
            count = store.items.len(),
            "opened todo store"
        );
        store
    }

    /// Open an empty in-memory store with the default key.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Box::new(crate::storage::MemoryStore::new()), DEFAULT_STORAGE_KEY)
    }

    /// Read the persisted collection.
    ///
    /// Returns an empty list when nothing is stored, the backend fails, or
    /// the stored value is not a JSON array of todos. Duplicate ids keep
    /// their first occurrence, and an item whose `completed` flag disagrees
    /// with its status is treated as completed.
    #[must_use]
    pub fn load(&self) -> Vec<TodoItem> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read todos; starting empty");
                return Vec::new();
            }
        };

        let parsed: Vec<TodoItem> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = %self.key, error = %e, "stored todos are not valid; starting empty");
                return Vec::new();
            }
        };

        normalize(parsed)
    }

    /// Serialize `items` and overwrite the persisted collection.
    pub fn save(&self, items: &[TodoItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            // coverage:ignore - TodoItem always serializes
            Err(e) => {
                warn!(error = %e, "failed to serialize todos");
                return;
            }
        };
        if let Err(e) = self.backend.set(&self.key, &json) {
            warn!(key = %self.key, error = %e, "failed to write todos");
        }
    }

    fn persist(&self) {
        self.save(&self.items);
    }

    /// All todos, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Number of todos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no todos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The storage key this store writes to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The injected backend.
    #[must_use]
    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Get a todo by ID.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&TodoItem> {
        self.items.iter().find(|t| t.id == id)
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|t| t.id == id)
    }

    /// Append a new todo.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTitle`] or [`Error::CompletedStatus`] when the
    /// input is invalid, and [`Error::DuplicateId`] when an explicit id is
    /// already in use.
    pub fn add(&mut self, todo: NewTodo) -> Result<TodoItem> {
        todo.validate()?;

        let now = now_millis();
        let id = match todo.id {
            Some(id) if self.get(id).is_some() => return Err(Error::DuplicateId(id)),
            Some(id) => id,
            None => next_todo_id(now, |candidate| self.get(candidate).is_some()),
        };
        let created_at = Utc.timestamp_millis_opt(now).single().or_else(|| Some(Utc::now()));

        let item = TodoItem {
            id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            completed: false,
            created_at,
        };
        self.items.push(item.clone());
        self.persist();

        debug!(id, status = %item.status, "added todo");
        Ok(item)
    }

    /// Update a todo's editable fields.
    ///
    /// Returns `Ok(None)` without writing anything when the id is unknown or
    /// the todo is already completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update sets an empty title or the completed
    /// status.
    pub fn update(&mut self, id: i64, update: TodoUpdate) -> Result<Option<TodoItem>> {
        update.validate()?;

        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        if self.items[index].completed {
            debug!(id, "ignoring update to completed todo");
            return Ok(None);
        }
        if update.is_empty() {
            return Ok(Some(self.items[index].clone()));
        }

        let item = &mut self.items[index];
        if let Some(title) = update.title {
            item.title = title;
        }
        if let Some(description) = update.description {
            item.description = description;
        }
        if let Some(status) = update.status {
            item.status = status;
        }
        let updated = item.clone();
        self.persist();

        debug!(id, "updated todo");
        Ok(Some(updated))
    }

    /// Delete a todo. Returns false if it did not exist.
    pub fn delete(&mut self, id: i64) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.items.remove(index);
        self.persist();

        debug!(id, "deleted todo");
        true
    }

    /// Mark a todo as completed. This cannot be undone.
    ///
    /// Returns `None` if the todo does not exist or is already completed.
    pub fn complete(&mut self, id: i64) -> Option<TodoItem> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        if item.completed {
            return None;
        }
        item.status = Status::Completed;
        item.completed = true;
        let completed = item.clone();
        self.persist();

        debug!(id, "completed todo");
        Some(completed)
    }

    /// Todos passing `filter`, in insertion order.
    #[must_use]
    pub fn filter(&self, filter: StatusFilter) -> Vec<&TodoItem> {
        self.items.iter().filter(|t| filter.matches(t)).collect()
    }
}

/// Restore collection invariants on data read from storage.
fn normalize(items: Vec<TodoItem>) -> Vec<TodoItem> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut result = Vec::with_capacity(items.len());

    for mut item in items {
        if !seen.insert(item.id) {
            warn!(id = item.id, "dropping duplicate stored todo");
            continue;
        }
        if item.completed || item.status == Status::Completed {
            item.completed = true;
            item.status = Status::Completed;
        }
        result.push(item);
    }

    result
}
