//! The todo board: view state layered over a [`TodoStore`].
//!
//! The board tracks what a user interface needs between events: the active
//! status filter, the confirmation that is waiting for an answer, and the
//! add/edit form. Every mutation still goes through the store.

use crate::error::Result;
use crate::todos::models::{NewTodo, Status, StatusFilter, TodoItem, TodoUpdate};
use crate::todos::pending::{Action, PendingAction};
use crate::todos::store::TodoStore;

/// Message shown when there are no todos at all.
pub const EMPTY_BOARD_MESSAGE: &str = "No todos yet. Click the \"+ TODO\" button to add one.";

/// Message shown when the filter hides every todo.
pub const NO_MATCH_MESSAGE: &str = "No todos match the selected filter.";

/// Contents of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoForm {
    /// The todo being edited, or `None` when adding.
    pub editing: Option<i64>,
    /// Title field.
    pub title: String,
    /// Rich-text description field.
    pub description: String,
    /// Status selection.
    pub status: Status,
}

impl TodoForm {
    /// A blank form for adding a todo.
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// A form pre-filled from an existing todo.
    #[must_use]
    pub fn for_item(item: &TodoItem) -> Self {
        Self {
            editing: Some(item.id),
            title: item.title.clone(),
            description: item.description.clone(),
            status: item.status,
        }
    }
}

/// Outcome of resolving a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The action that was pending.
    pub action: Action,
    /// The todo it targeted.
    pub target: i64,
    /// Whether the store actually changed.
    pub applied: bool,
}

/// View state for one todo list session.
#[derive(Debug)]
pub struct TodoBoard {
    store: TodoStore,
    pending: PendingAction,
    filter: StatusFilter,
    form: Option<TodoForm>,
}

impl TodoBoard {
    /// Wrap a store. Starts with no filter, no pending action and no form.
    #[must_use]
    pub fn new(store: TodoStore) -> Self {
        Self { store, pending: PendingAction::None, filter: StatusFilter::All, form: None }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Give back the underlying store.
    #[must_use]
    pub fn into_store(self) -> TodoStore {
        self.store
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Change the active filter.
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Todos passing the active filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&TodoItem> {
        self.store.filter(self.filter)
    }

    /// What to show instead of a list, if the list is empty.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.store.is_empty() {
            Some(EMPTY_BOARD_MESSAGE)
        } else if self.visible().is_empty() {
            Some(NO_MATCH_MESSAGE)
        } else {
            None
        }
    }

    // Confirmation flow

    /// The action waiting for confirmation.
    #[must_use]
    pub const fn pending(&self) -> PendingAction {
        self.pending
    }

    /// Ask to delete a todo. Returns false if it does not exist.
    pub fn request_delete(&mut self, id: i64) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        self.pending.request(Action::Delete, id);
        true
    }

    /// Ask to complete a todo. Returns false if it does not exist or is
    /// already completed.
    pub fn request_complete(&mut self, id: i64) -> bool {
        if !self.store.get(id).is_some_and(TodoItem::is_editable) {
            return false;
        }
        self.pending.request(Action::Complete, id);
        true
    }

    /// Apply the pending action, if there is one.
    pub fn confirm(&mut self) -> Option<Resolution> {
        let (action, target) = self.pending.confirm()?;
        let applied = match action {
            Action::Delete => self.store.delete(target),
            Action::Complete => self.store.complete(target).is_some(),
        };
        tracing::debug!(%action, target, applied, "resolved confirmation");
        Some(Resolution { action, target, applied })
    }

    /// Drop the pending action without applying it.
    pub fn cancel(&mut self) {
        self.pending.cancel();
    }

    // Add/edit form

    /// The open form, if any.
    #[must_use]
    pub const fn form(&self) -> Option<&TodoForm> {
        self.form.as_ref()
    }

    /// Mutable access to the open form's fields.
    pub fn form_mut(&mut self) -> Option<&mut TodoForm> {
        self.form.as_mut()
    }

    /// Open a blank form for adding a todo.
    pub fn open_add_form(&mut self) {
        self.form = Some(TodoForm::blank());
    }

    /// Open the edit form for a todo. Completed todos cannot be edited, so
    /// this returns false for them and for unknown ids.
    pub fn open_edit_form(&mut self, id: i64) -> bool {
        match self.store.get(id) {
            Some(item) if item.is_editable() => {
                self.form = Some(TodoForm::for_item(item));
                true
            }
            _ => false,
        }
    }

    /// Close the form without saving.
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form.
    ///
    /// Validation happens here, before the store is touched; on failure the
    /// form stays open with its contents. On success the form closes and the
    /// added or updated todo is returned. Returns `Ok(None)` when no form is
    /// open or the edited todo no longer accepts edits.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty title or completed status.
    pub fn submit_form(&mut self) -> Result<Option<TodoItem>> {
        let Some(form) = self.form.clone() else {
            return Ok(None);
        };

        let result = match form.editing {
            None => {
                let todo = NewTodo {
                    id: None,
                    title: form.title,
                    description: form.description,
                    status: form.status,
                };
                todo.validate()?;
                self.store.add(todo).map(Some)
            }
            Some(id) => {
                let update = TodoUpdate {
                    title: Some(form.title),
                    description: Some(form.description),
                    status: Some(form.status),
                };
                update.validate()?;
                self.store.update(id, update)
            }
        }?;

        self.form = None;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn board_with(titles: &[(&str, Status)]) -> TodoBoard {
        let mut store = TodoStore::in_memory();
        for (i, (title, status)) in titles.iter().enumerate() {
            let id = i64::try_from(i).unwrap() + 1;
            store
                .add(NewTodo { id: Some(id), ..NewTodo::titled(*title).with_status(*status) })
                .unwrap();
        }
        TodoBoard::new(store)
    }

    #[test]
    fn test_empty_messages() {
        let mut board = board_with(&[]);
        assert_eq!(board.empty_message(), Some(EMPTY_BOARD_MESSAGE));

        board = board_with(&[("a", Status::Todo)]);
        assert_eq!(board.empty_message(), None);

        board.set_filter(StatusFilter::Only(Status::InQa));
        assert_eq!(board.empty_message(), Some(NO_MATCH_MESSAGE));
        assert!(board.visible().is_empty());
    }

    #[test]
    fn test_visible_follows_filter() {
        let mut board = board_with(&[("a", Status::Todo), ("b", Status::InProgress)]);
        assert_eq!(board.visible().len(), 2);
        board.set_filter(StatusFilter::Only(Status::InProgress));
        assert_eq!(board.filter(), StatusFilter::Only(Status::InProgress));
        let visible = board.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "b");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut board = board_with(&[("a", Status::Todo)]);
        assert!(board.request_delete(1));
        // Nothing happens until confirmed
        assert_eq!(board.store().len(), 1);
        assert_eq!(board.pending().message(), Some(Action::Delete.confirmation_message()));

        let resolution = board.confirm().unwrap();
        assert_eq!(resolution, Resolution { action: Action::Delete, target: 1, applied: true });
        assert!(board.store().is_empty());
        assert!(!board.pending().is_pending());
    }

    #[test]
    fn test_cancel_keeps_todo() {
        let mut board = board_with(&[("a", Status::Todo)]);
        board.request_complete(1);
        board.cancel();
        assert_eq!(board.confirm(), None);
        assert!(!board.store().get(1).unwrap().completed);
    }

    #[test]
    fn test_request_unknown_or_completed() {
        let mut board = board_with(&[("a", Status::Todo)]);
        assert!(!board.request_delete(99));
        assert!(!board.request_complete(99));
        assert!(!board.pending().is_pending());

        board.request_complete(1);
        board.confirm();
        assert!(!board.request_complete(1));
        // Completed todos can still be deleted
        assert!(board.request_delete(1));
    }

    #[test]
    fn test_confirm_after_external_delete_reports_not_applied() {
        let mut board = board_with(&[("a", Status::Todo)]);
        board.request_complete(1);
        board.store.delete(1);
        let resolution = board.confirm().unwrap();
        assert!(!resolution.applied);
    }

    #[test]
    fn test_add_form() {
        let mut board = board_with(&[]);
        board.open_add_form();
        {
            let form = board.form_mut().unwrap();
            form.title = "Write report".into();
            form.description = "<ul><li>List item</li></ul>".into();
            form.status = Status::StartingSoon;
        }
        let item = board.submit_form().unwrap().unwrap();
        assert_eq!(item.title, "Write report");
        assert_eq!(item.status, Status::StartingSoon);
        assert!(board.form().is_none());
        assert_eq!(board.store().len(), 1);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut board = board_with(&[]);
        board.open_add_form();
        assert!(matches!(board.submit_form(), Err(Error::EmptyTitle)));
        assert!(board.form().is_some());
        assert!(board.store().is_empty());
    }

    #[test]
    fn test_edit_form() {
        let mut board = board_with(&[("a", Status::Todo)]);
        assert!(board.open_edit_form(1));
        assert_eq!(board.form().unwrap().title, "a");
        board.form_mut().unwrap().title = "renamed".into();
        let item = board.submit_form().unwrap().unwrap();
        assert_eq!(item.title, "renamed");
        assert_eq!(board.store().get(1).unwrap().title, "renamed");
    }

    #[test]
    fn test_edit_form_refused_for_completed() {
        let mut board = board_with(&[("a", Status::Todo)]);
        board.request_complete(1);
        board.confirm();
        assert!(!board.open_edit_form(1));
        assert!(!board.open_edit_form(42));
        assert!(board.form().is_none());
    }

    #[test]
    fn test_submit_without_form() {
        let mut board = board_with(&[]);
        assert_eq!(board.submit_form().unwrap(), None);
        board.open_add_form();
        board.close_form();
        assert_eq!(board.submit_form().unwrap(), None);
    }

    #[test]
    fn test_into_store() {
        let board = board_with(&[("a", Status::Todo)]);
        assert_eq!(board.into_store().len(), 1);
    }
}
