use crate::model::Todo;
use log::debug;
use std::collections::HashSet;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// Outcome of an edit. Editing to blank text removes the todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    Renamed(Todo),
    Destroyed(Todo),
    Unchanged,
    NotFound,
}

/// The ordered list of todos. Insertion order is the user's arrangement and
/// only changes through `create` (append) or `reorder`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded records. Later duplicates of an id are
    /// dropped so every id stays unique.
    pub fn from_todos(todos: Vec<Todo>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(todos.len());
        for todo in todos {
            if seen.insert(todo.id.clone()) {
                unique.push(todo);
            } else {
                debug!("event=store_load_duplicate module=store id={}", todo.id);
            }
        }
        Self { todos: unique }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn into_todos(self) -> Vec<Todo> {
        self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.index_of(id).map(|index| &self.todos[index])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.todos.iter().map(|todo| todo.id.clone()).collect()
    }

    /// Appends a new active todo. Blank titles are ignored.
    pub fn create(&mut self, title: &str) -> Option<Todo> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }

        let todo = Todo::new(trimmed);
        self.todos.push(todo.clone());
        Some(todo)
    }

    /// Flips `completed` and returns the new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let index = self.index_of(id)?;
        let todo = &mut self.todos[index];
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    pub fn set_completed_all(&mut self, completed: bool) {
        for todo in &mut self.todos {
            todo.completed = completed;
        }
    }

    pub fn edit(&mut self, id: &str, new_title: &str) -> EditResult {
        let Some(index) = self.index_of(id) else {
            return EditResult::NotFound;
        };

        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            return EditResult::Destroyed(self.todos.remove(index));
        }

        let todo = &mut self.todos[index];
        if todo.title == trimmed {
            return EditResult::Unchanged;
        }
        todo.title = trimmed.to_string();
        EditResult::Renamed(todo.clone())
    }

    pub fn destroy(&mut self, id: &str) -> Option<Todo> {
        let index = self.index_of(id)?;
        Some(self.todos.remove(index))
    }

    /// Removes every completed todo and returns how many were dropped.
    pub fn destroy_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|todo| !todo.completed);
        before - self.todos.len()
    }

    /// Sets `deadline = now + minutes`, or clears it for non-positive input.
    /// Returns the resulting deadline, or `None` when the id is unknown.
    pub fn set_deadline(&mut self, id: &str, minutes: i64, now_millis: i64) -> Option<Option<i64>> {
        let index = self.index_of(id)?;
        let deadline = if minutes > 0 {
            Some(now_millis.saturating_add(minutes.saturating_mul(MILLIS_PER_MINUTE)))
        } else {
            None
        };
        self.todos[index].deadline = deadline;
        Some(deadline)
    }

    /// Rearranges the list to follow `order`. Anything other than a
    /// permutation of the current ids is rejected and leaves the list as is.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> bool {
        if !self.is_permutation(order) {
            debug!(
                "event=reorder_rejected module=store expected={} given={}",
                self.todos.len(),
                order.len()
            );
            return false;
        }

        let mut remaining = std::mem::take(&mut self.todos);
        for id in order {
            if let Some(index) = remaining.iter().position(|todo| todo.id == id.as_ref()) {
                self.todos.push(remaining.swap_remove(index));
            }
        }
        true
    }

    fn is_permutation<S: AsRef<str>>(&self, order: &[S]) -> bool {
        if order.len() != self.todos.len() {
            return false;
        }

        let mut seen = HashSet::with_capacity(order.len());
        order
            .iter()
            .all(|id| seen.insert(id.as_ref()) && self.index_of(id.as_ref()).is_some())
    }
}

/// Parses the minutes typed into a deadline field: an optional sign followed
/// by leading digits, ignoring whatever follows. Unparsable input yields 0,
/// which clears the deadline.
pub fn parse_minutes(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |value, digit| {
            value
                .saturating_mul(10)
                .saturating_add(sign * i64::from(digit - b'0'))
        })
}
