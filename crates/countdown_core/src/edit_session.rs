use crate::model::Todo;
use crate::store::{EditResult, TodoStore};

/// An in-progress title edit.
///
/// Enter or leaving the field commits; Escape aborts and the original title
/// stays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    todo_id: String,
    original_title: String,
    pending: String,
    aborted: bool,
}

impl EditSession {
    pub fn begin(todo: &Todo) -> Self {
        Self {
            todo_id: todo.id.clone(),
            original_title: todo.title.clone(),
            pending: todo.title.clone(),
            aborted: false,
        }
    }

    pub fn todo_id(&self) -> &str {
        &self.todo_id
    }

    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn set_text(&mut self, text: &str) {
        self.pending = text.to_string();
    }

    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn commit(self, store: &mut TodoStore) -> EditResult {
        if self.aborted {
            return EditResult::Unchanged;
        }
        store.edit(&self.todo_id, &self.pending)
    }
}
