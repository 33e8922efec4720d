use std::sync::Arc;

use axum::Router;
use sea_orm::{
    ConnectOptions, Database, DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult,
};

use crate::{config::AppConfig, db::TodoRepository, routes, state::AppState};

/// A private in-memory SQLite database. One connection, so every query sees
/// the same database.
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opt).await.expect("connect to in-memory sqlite")
}

/// A connection that accepts schema setup and fails every query after it.
pub fn failing_db() -> DatabaseConnection {
    let ddl_ok = || MockExecResult {
        last_insert_id: 0,
        rows_affected: 0,
    };
    MockDatabase::new(DatabaseBackend::Sqlite)
        .append_exec_results([ddl_ok(), ddl_ok()])
        .into_connection()
}

pub async fn test_state_with(db: DatabaseConnection) -> Arc<AppState> {
    let todos = TodoRepository::new(db).await.expect("create repository");
    AppState::new(AppConfig::default(), todos)
}

pub async fn test_state() -> Arc<AppState> {
    test_state_with(memory_db().await).await
}

pub async fn test_app() -> Router {
    routes::app(test_state().await).expect("build app")
}

pub async fn failing_app() -> Router {
    routes::app(test_state_with(failing_db()).await).expect("build app")
}
