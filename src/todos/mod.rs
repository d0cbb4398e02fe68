// Per-user to-do list

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::Todo;
pub use repository::{TodoRepository, TodoStore};
pub use service::TodoService;
