use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::entities::todo;

/// A todo as exchanged over the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    /// HTML-escaped on the way in.
    pub text: String,
    pub completed: bool,
    #[schema(example = "2026-02-16T08:00:00.000Z")]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// 1 to 500 characters after trimming.
    #[schema(min_length = 1, max_length = 500)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

impl From<todo::Model> for Todo {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            completed: model.completed,
            created_at: model.created_at,
        }
    }
}
