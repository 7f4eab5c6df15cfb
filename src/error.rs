//! Error types for `todo_keeper`.

/// Errors that can occur while managing todos.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error occurred.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A `SQLite` database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A template error occurred.
    #[error("Template error: {0}")]
    Template(String),

    /// A storage backend failed for a reason other than I/O or SQL.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A todo was submitted without a title.
    #[error("title must not be empty")]
    EmptyTitle,

    /// A todo was given the completed status outside of the completion flow.
    #[error("todos can only become COMPLETED by marking them complete")]
    CompletedStatus,

    /// A todo with the requested id already exists.
    #[error("a todo with id {0} already exists")]
    DuplicateId(i64),

    /// A status string could not be parsed.
    #[error(transparent)]
    InvalidStatus(#[from] crate::todos::InvalidStatus),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
