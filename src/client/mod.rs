//! Client side of the todo API: an HTTP wrapper that turns every outcome into
//! a typed result, a state container that mirrors the server list, and the
//! HTML components that render that state.

pub mod api;
pub mod config;
pub mod error;
pub mod store;
pub mod view;

pub use api::{HttpTodoApi, TodoApi};
pub use config::ClientConfig;
pub use error::{ApiResult, ClientError};
pub use store::{LoadHandle, TodoAction, TodoState, TodoStore};
