//! Confirmation-gated actions.
//!
//! Destructive or irreversible mutations go through two phases: a request
//! that records what would happen, then a confirm or cancel that resolves
//! it. At most one action is pending at a time; a new request replaces the
//! old one.

/// A mutation that needs confirmation before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Remove the todo.
    Delete,
    /// Mark the todo completed, which locks it against edits.
    Complete,
}

impl Action {
    /// The question shown to the user before the action runs.
    #[must_use]
    pub const fn confirmation_message(&self) -> &'static str {
        match self {
            Self::Delete => "Are you sure you want to delete this todo?",
            Self::Complete => {
                "Mark this todo as completed? You won't be able to edit it afterward."
            }
        }
    }

    /// Get the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The action awaiting confirmation, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingAction {
    /// Nothing is waiting.
    #[default]
    None,
    /// `action` will be applied to the todo with id `target` on confirm.
    Pending {
        /// What to do.
        action: Action,
        /// Which todo to do it to.
        target: i64,
    },
}

impl PendingAction {
    /// Record a new pending action, replacing any existing one.
    pub fn request(&mut self, action: Action, target: i64) {
        *self = Self::Pending { action, target };
    }

    /// Resolve the pending action as accepted, returning it.
    pub fn confirm(&mut self) -> Option<(Action, i64)> {
        match std::mem::take(self) {
            Self::None => None,
            Self::Pending { action, target } => Some((action, target)),
        }
    }

    /// Discard the pending action.
    pub fn cancel(&mut self) {
        *self = Self::None;
    }

    /// Whether something is waiting for confirmation.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Confirmation message for the pending action.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Pending { action, .. } => Some(action.confirmation_message()),
        }
    }
}
