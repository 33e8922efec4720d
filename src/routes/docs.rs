use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{health, todo};
use crate::{
    error::ErrorBody,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", description = "CRUD over a single list of todos"),
    paths(
        todo::list_todos,
        todo::create_todo,
        todo::update_todo,
        todo::delete_todo,
        health::health,
    ),
    components(schemas(Todo, CreateTodoRequest, UpdateTodoRequest, ErrorBody, health::Health)),
    tags(
        (name = "todos", description = "Todo list operations"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Swagger UI under `/docs`, backed by the generated document.
pub fn router() -> Router {
    SwaggerUi::new(DOCS_PATH)
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn documents_every_json_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialize openapi");
        let paths = doc["paths"].as_object().expect("paths object");

        for path in ["/api/todos", "/api/todos/{id}", "/health"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/api/todos/{id}"].get("patch").is_some());
        assert!(paths["/api/todos/{id}"].get("delete").is_some());
        assert!(doc["components"]["schemas"]["Todo"]["properties"]
            .get("createdAt")
            .is_some());
    }
}
