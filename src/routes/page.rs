use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::{
    client::{ClientError, TodoState, view::TodoPage},
    error::AppError,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", get(todo_page)).with_state(state)
}

/// Server-rendered snapshot of the list, built from the same components the
/// client renders.
async fn todo_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let (status, view) = match state.todos.get_all().await {
        Ok(todos) => (
            StatusCode::OK,
            TodoState {
                todos,
                loading: false,
                error: None,
            },
        ),
        Err(err) => {
            tracing::error!(error = %err, "failed to load todos for page");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                TodoState {
                    todos: Vec::new(),
                    loading: false,
                    error: Some(ClientError::ServerUnavailable),
                },
            )
        }
    };

    let rendered = TodoPage::from_state(&view, "").render().map_err(|err| {
        tracing::error!(error = %err, "failed to render todo page");
        AppError::internal("failed to render todo page")
    })?;
    Ok((status, Html(rendered)).into_response())
}
