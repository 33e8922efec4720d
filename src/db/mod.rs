pub mod connection;
pub mod entities;
pub mod todo_repo;

pub use todo_repo::{RepoError, RepoResult, TodoRepository};
