//! Request validation for the todo endpoints.
//!
//! Bodies are checked by hand against fixed shapes so the rules (and their
//! messages) do not depend on the extractor the router happens to use.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AppError;

pub const MAX_TEXT_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::bad_request(err.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    /// Trimmed, not yet escaped.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTodo {
    pub completed: bool,
}

/// Accepts positive integers only. Everything else is reported as "not found".
pub fn parse_todo_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id >= 1)
}

pub fn validate_create(body: &[u8]) -> Result<CreateTodo, ValidationError> {
    let object = json_object(body)?;
    let text = match object.get("text") {
        None => return Err(ValidationError::new("body must have required property 'text'")),
        Some(Value::String(text)) => text,
        Some(_) => return Err(ValidationError::new("body/text must be string")),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::new("Text cannot be empty"));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::new(format!(
            "body/text must NOT have more than {MAX_TEXT_CHARS} characters"
        )));
    }

    Ok(CreateTodo {
        text: text.to_string(),
    })
}

pub fn validate_update(body: &[u8]) -> Result<UpdateTodo, ValidationError> {
    let object = json_object(body)?;
    match object.get("completed") {
        None => Err(ValidationError::new(
            "body must have required property 'completed'",
        )),
        Some(Value::Bool(completed)) => Ok(UpdateTodo {
            completed: *completed,
        }),
        Some(_) => Err(ValidationError::new("body/completed must be boolean")),
    }
}

/// Escapes the characters that are significant in HTML.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn json_object(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => Err(ValidationError::new("body must be object")),
    }
}
