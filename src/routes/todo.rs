use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};

use super::validation::{
    CreateTodo, UpdateTodo, parse_todo_id, sanitize_text, validate_create, validate_update,
};
use crate::{
    error::{AppError, ErrorBody},
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(state)
}

/// All todos, newest first.
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    responses(
        (status = 200, description = "Every todo", body = [Todo]),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub(crate) async fn list_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.get_all().await?;
    Ok(Json(todos))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub(crate) async fn create_todo(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let CreateTodo { text } = validate_create(&body)?;
    let todo = state.todos.create(&sanitize_text(&text)).await?;
    tracing::debug!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[utoipa::path(
    patch,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub(crate) async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, AppError> {
    let id = parse_todo_id(&raw_id).ok_or_else(AppError::todo_not_found)?;
    let UpdateTodo { completed } = validate_update(&body)?;
    let todo = state
        .todos
        .update(id, completed)
        .await?
        .ok_or_else(AppError::todo_not_found)?;
    Ok(Json(todo))
}

#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = i64, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "No todo with that id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody),
    )
)]
pub(crate) async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_todo_id(&raw_id).ok_or_else(AppError::todo_not_found)?;
    if !state.todos.delete(id).await? {
        return Err(AppError::todo_not_found());
    }
    tracing::debug!(id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
