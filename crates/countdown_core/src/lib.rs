pub mod alert;
pub mod app;
pub mod clock;
pub mod config;
pub mod deadline;
pub mod edit_session;
pub mod error;
pub mod logging;
pub mod model;
pub mod render;
pub mod reorder;
pub mod storage;
pub mod store;
pub mod ticker;
pub mod view;

pub use app::{Action, App, AppSettings, Outcome};
pub use error::AppError;
pub use model::{Filter, Todo};
pub use store::TodoStore;
