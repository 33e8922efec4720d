use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use thiserror::Error;

use super::entities::{prelude::Todo as TodoEntity, todo};
use crate::models::Todo;

// AUTOINCREMENT keeps deleted ids from being handed out again.
const CREATE_TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL CHECK (length(text) > 0),
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos (created_at)";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Text cannot be empty")]
    EmptyText,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// The only code path that reads or writes the `todos` table.
#[derive(Clone)]
pub struct TodoRepository {
    db: DatabaseConnection,
}

impl TodoRepository {
    /// Takes ownership of a connection handle and makes sure the schema exists.
    pub async fn new(db: DatabaseConnection) -> RepoResult<Self> {
        db.execute_unprepared(CREATE_TODOS_TABLE).await?;
        db.execute_unprepared(CREATE_CREATED_AT_INDEX).await?;
        Ok(Self { db })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create(&self, text: &str) -> RepoResult<Todo> {
        if text.trim().is_empty() {
            return Err(RepoError::EmptyText);
        }

        let model = todo::ActiveModel {
            text: Set(text.to_string()),
            completed: Set(false),
            ..Default::default()
        };
        let inserted = TodoEntity::insert(model).exec(&self.db).await?;
        let id = inserted.last_insert_id;

        match TodoEntity::find_by_id(id).one(&self.db).await? {
            Some(row) => Ok(row.into()),
            None => {
                tracing::warn!(id, "inserted todo not found on read-back");
                Ok(Todo {
                    id,
                    text: text.to_string(),
                    completed: false,
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                })
            }
        }
    }

    /// Newest first. Rows sharing a timestamp fall back to id order.
    pub async fn get_all(&self) -> RepoResult<Vec<Todo>> {
        let rows = TodoEntity::find()
            .order_by_desc(todo::Column::CreatedAt)
            .order_by_desc(todo::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Todo::from).collect())
    }

    pub async fn update(&self, id: i64, completed: bool) -> RepoResult<Option<Todo>> {
        let result = TodoEntity::update_many()
            .col_expr(todo::Column::Completed, Expr::value(completed))
            .filter(todo::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let row = TodoEntity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Todo::from))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = TodoEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
