// User accounts: persistence, orchestration and HTTP surface

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{User, UserResponse};
pub use repository::{UserRepository, UserStore};
pub use service::UserService;
