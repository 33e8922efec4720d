use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    config::ClientConfig,
    error::{ApiResult, ClientError},
};
use crate::models::{CreateTodoRequest, Todo, UpdateTodoRequest};

const TODOS_PATH: &str = "/api/todos";

/// Which call produced a response; some statuses read differently per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn targets_existing_todo(self) -> bool {
        matches!(self, Operation::Update | Operation::Delete)
    }
}

#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn get_todos(&self) -> ApiResult<Vec<Todo>>;
    async fn create_todo(&self, text: &str) -> ApiResult<Todo>;
    async fn update_todo(&self, id: i64, completed: bool) -> ApiResult<Todo>;
    async fn delete_todo(&self, id: i64) -> ApiResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    http: Client,
    base_url: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        Self::new(cfg.base_url.clone())
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn todos_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.base_url)
    }

    fn todo_url(&self, id: i64) -> String {
        format!("{}{TODOS_PATH}/{id}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|err| {
            tracing::debug!(error = %err, "todo api request did not complete");
            ClientError::Network
        })
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn get_todos(&self) -> ApiResult<Vec<Todo>> {
        let response = self.send(self.http.get(self.todos_url())).await?;
        read_json(response, Operation::List).await
    }

    async fn create_todo(&self, text: &str) -> ApiResult<Todo> {
        let body = CreateTodoRequest {
            text: text.to_string(),
        };
        let response = self
            .send(self.http.post(self.todos_url()).json(&body))
            .await?;
        read_json(response, Operation::Create).await
    }

    async fn update_todo(&self, id: i64, completed: bool) -> ApiResult<Todo> {
        let body = UpdateTodoRequest { completed };
        let response = self
            .send(self.http.patch(self.todo_url(id)).json(&body))
            .await?;
        read_json(response, Operation::Update).await
    }

    async fn delete_todo(&self, id: i64) -> ApiResult<()> {
        let response = self.send(self.http.delete(self.todo_url(id))).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(error_for_status(status, &body, Operation::Delete))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, operation: Operation) -> ApiResult<T> {
    let status = response.status();
    let body = response.bytes().await;

    if !status.is_success() {
        let body = body.unwrap_or_default();
        return Err(error_for_status(status, &body, operation));
    }

    let body = body.map_err(|_| ClientError::UnexpectedResponse)?;
    serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(error = %err, "todo api returned an unreadable body");
        ClientError::UnexpectedResponse
    })
}

/// Maps a non-2xx response to the error shown to the user.
pub fn error_for_status(status: StatusCode, body: &[u8], operation: Operation) -> ClientError {
    tracing::debug!(
        status = status.as_u16(),
        detail = %extract_message(status, body),
        ?operation,
        "todo api request failed"
    );

    if status.is_server_error() {
        return ClientError::ServerUnavailable;
    }

    if status == StatusCode::NOT_FOUND && operation.targets_existing_todo() {
        return ClientError::NotFound;
    }

    if status == StatusCode::BAD_REQUEST {
        return match body_message(body) {
            Some(message) if is_empty_text_message(&message) => ClientError::EmptyText,
            Some(message) => ClientError::Rejected(message),
            None => ClientError::Unknown,
        };
    }

    ClientError::Unknown
}

/// The best description of a failed response: the body's `message`, then the
/// status text, then a fixed fallback.
pub fn extract_message(status: StatusCode, body: &[u8]) -> String {
    body_message(body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| ClientError::UnexpectedResponse.to_string())
}

fn body_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_string())
}

fn is_empty_text_message(message: &str) -> bool {
    const EMPTY_FIELD_PHRASES: &[&str] = &[
        "required property 'text'",
        "fewer than 1 characters",
        "cannot be empty",
        "must not be empty",
        "is required",
        "text required",
    ];
    let message = message.to_ascii_lowercase();
    EMPTY_FIELD_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}
