use crate::error::AppError;
use crate::model::Todo;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub mod json_store;

pub use json_store::JsonFileStore;

pub const DEFAULT_NAMESPACE: &str = "todos-countdown";

/// Durable storage for the whole ordered list.
///
/// `load` never fails: absent or unreadable data is an empty list.
pub trait TodoRepository {
    fn load(&self, namespace: &str) -> Vec<Todo>;

    fn save(&self, namespace: &str, todos: &[Todo]) -> Result<(), AppError>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for Box<R> {
    fn load(&self, namespace: &str) -> Vec<Todo> {
        (**self).load(namespace)
    }

    fn save(&self, namespace: &str, todos: &[Todo]) -> Result<(), AppError> {
        (**self).save(namespace, todos)
    }
}

/// In-process storage. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    lists: Rc<RefCell<HashMap<String, Vec<Todo>>>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(namespace: &str, todos: Vec<Todo>) -> Self {
        let store = Self::new();
        store
            .lists
            .borrow_mut()
            .insert(namespace.to_string(), todos);
        store
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl TodoRepository for MemoryStore {
    fn load(&self, namespace: &str) -> Vec<Todo> {
        self.lists
            .borrow()
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, namespace: &str, todos: &[Todo]) -> Result<(), AppError> {
        self.lists
            .borrow_mut()
            .insert(namespace.to_string(), todos.to_vec());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
