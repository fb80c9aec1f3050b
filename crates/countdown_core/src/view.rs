use crate::model::{Filter, Todo};
use crate::store::TodoStore;

/// Everything a renderer needs for the list and its footer. Always rebuilt
/// from the store, never kept across mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub todos: Vec<Todo>,
    pub filter: Filter,
    pub active_count: usize,
    pub completed_count: usize,
    pub total_count: usize,
}

impl ListView {
    pub fn project(store: &TodoStore, filter: Filter) -> Self {
        let todos = filtered_todos(store, filter);
        let active_count = store.todos().iter().filter(|todo| !todo.completed).count();
        let total_count = store.len();

        Self {
            todos,
            filter,
            active_count,
            completed_count: total_count - active_count,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Drives the "toggle all" checkbox.
    pub fn all_completed(&self) -> bool {
        self.active_count == 0
    }

    pub fn show_footer(&self) -> bool {
        self.total_count > 0
    }

    pub fn show_clear_completed(&self) -> bool {
        self.completed_count > 0
    }

    pub fn reorder_enabled(&self) -> bool {
        crate::reorder::reorder_enabled(self.filter)
    }

    /// "1 item left", "3 items left".
    pub fn footer_summary(&self) -> String {
        format!(
            "{} {} left",
            self.active_count,
            pluralize(self.active_count as i64, "item")
        )
    }
}

pub fn filtered_todos(store: &TodoStore, filter: Filter) -> Vec<Todo> {
    store
        .todos()
        .iter()
        .filter(|todo| filter.matches(todo))
        .cloned()
        .collect()
}

pub fn active_todos(store: &TodoStore) -> Vec<Todo> {
    filtered_todos(store, Filter::Active)
}

pub fn completed_todos(store: &TodoStore) -> Vec<Todo> {
    filtered_todos(store, Filter::Completed)
}

/// Todos the deadline scheduler looks at: a deadline is set and the todo is
/// still active.
pub fn deadline_todos(store: &TodoStore) -> Vec<Todo> {
    store
        .todos()
        .iter()
        .filter(|todo| todo.has_deadline() && !todo.completed)
        .cloned()
        .collect()
}

pub fn pluralize(count: i64, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
