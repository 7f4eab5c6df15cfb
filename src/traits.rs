//! Core traits for testability and abstraction.

use crate::error::Result;

/// Trait for the key-value storage a todo list is persisted to.
///
/// Values are whole documents; writers overwrite the previous value rather
/// than patching it. The production implementation uses `SQLite`, while
/// tests and throwaway sessions use an in-memory map.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Short backend name for log messages.
    fn name(&self) -> &'static str;
}

/// Trait for asking the user to confirm a pending action.
///
/// This trait abstracts the terminal prompt for testability.
pub trait Prompter {
    /// Show `message` and return whether the user accepted.
    fn confirm(&self, message: &str) -> bool;
}
