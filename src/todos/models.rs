//! Todo model types.
//!
//! The JSON shape matches the array the browser todo manager kept under its
//! `todos` storage key, so existing dumps load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    /// Not started (default).
    #[default]
    #[serde(rename = "TODO")]
    Todo,
    /// Scheduled to start shortly.
    #[serde(rename = "STARTING SOON")]
    StartingSoon,
    /// Being worked on.
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    /// Waiting on quality assurance.
    #[serde(rename = "IN QA")]
    InQa,
    /// Done. Only reachable through [`TodoStore::complete`](super::TodoStore::complete).
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Self; 5] =
        [Self::Todo, Self::StartingSoon, Self::InProgress, Self::InQa, Self::Completed];

    /// Statuses a todo may be given through the edit form.
    pub const EDITABLE: [Self; 4] = [Self::Todo, Self::StartingSoon, Self::InProgress, Self::InQa];

    /// Parse a status from a string.
    ///
    /// Accepts the stored form (`IN PROGRESS`) as well as `in_progress` and
    /// `in-progress`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_uppercase() })
            .collect();
        match normalized.as_str() {
            "TODO" => Ok(Self::Todo),
            "STARTING SOON" => Ok(Self::StartingSoon),
            "IN PROGRESS" => Ok(Self::InProgress),
            "IN QA" => Ok(Self::InQa),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }

    /// Get the stored string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::StartingSoon => "STARTING SOON",
            Self::InProgress => "IN PROGRESS",
            Self::InQa => "IN QA",
            Self::Completed => "COMPLETED",
        }
    }

    /// Get the human label used on filter buttons.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::StartingSoon => "Starting Soon",
            Self::InProgress => "In Progress",
            Self::InQa => "In QA",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid status string is provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl std::fmt::Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status: '{}' (must be one of: {})",
            self.0,
            Status::ALL.map(|s| s.as_str()).join(", ")
        )
    }
}

impl std::error::Error for InvalidStatus {}

/// Which todos a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every todo.
    #[default]
    All,
    /// Only todos with the given status.
    Only(Status),
}

impl StatusFilter {
    /// Parse a filter; `all` (any case) selects everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither `all` nor a valid status.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, InvalidStatus> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Status::from_str(s).map(Self::Only)
    }

    /// Check whether a todo passes this filter.
    #[must_use]
    pub fn matches(&self, todo: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => todo.status == *status,
        }
    }
}

/// A single todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Creation timestamp in milliseconds; the identity key.
    pub id: i64,
    /// Short title, never empty.
    pub title: String,
    /// Rich-text description (an HTML fragment). Stored as given.
    #[serde(default)]
    pub description: String,
    /// Current status.
    #[serde(default)]
    pub status: Status,
    /// Whether the todo has been marked complete.
    #[serde(default)]
    pub completed: bool,
    /// When the todo was created. Older records may not have it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Completed todos can only be deleted.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        !self.completed
    }
}

/// Input for creating a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    /// Explicit id. Generated from the current time when `None`.
    pub id: Option<i64>,
    /// Title (required).
    pub title: String,
    /// Rich-text description.
    pub description: String,
    /// Initial status. Must not be [`Status::Completed`].
    pub status: Status,
}

impl NewTodo {
    /// A todo with just a title, in the default status.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Set the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check the title and status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTitle`](crate::Error::EmptyTitle) for a blank
    /// title and [`Error::CompletedStatus`](crate::Error::CompletedStatus) for
    /// a completed initial status.
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.trim().is_empty() {
            return Err(crate::Error::EmptyTitle);
        }
        if self.status == Status::Completed {
            return Err(crate::Error::CompletedStatus);
        }
        Ok(())
    }
}

/// Fields that can be updated on a todo.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    /// New title (if Some).
    pub title: Option<String>,
    /// New description (if Some).
    pub description: Option<String>,
    /// New status (if Some). Must not be [`Status::Completed`].
    pub status: Option<Status>,
}

impl TodoUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Check the fields that are set.
    ///
    /// # Errors
    ///
    /// Same rules as [`NewTodo::validate`], applied to the fields present.
    pub fn validate(&self) -> crate::Result<()> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(crate::Error::EmptyTitle);
        }
        if self.status == Some(Status::Completed) {
            return Err(crate::Error::CompletedStatus);
        }
        Ok(())
    }
}
