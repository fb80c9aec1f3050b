mod filter;
mod todo;

pub use filter::Filter;
pub use todo::{Todo, new_todo_id};
