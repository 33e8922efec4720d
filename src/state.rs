use std::sync::Arc;

use crate::{config::AppConfig, db::TodoRepository};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub todos: TodoRepository,
}

impl AppState {
    pub fn new(config: AppConfig, todos: TodoRepository) -> Arc<Self> {
        Arc::new(Self { config, todos })
    }
}
