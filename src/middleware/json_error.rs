use axum::{
    body::{Bytes, to_bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

const MAX_ERROR_BODY_BYTES: usize = 16 * 1024;

/// Rewrites framework-generated error responses (unknown route, wrong method,
/// rejected extractors) into the JSON error body the handlers use.
pub async fn json_error_middleware(req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    if !response.status().is_client_error() && !response.status().is_server_error() {
        return response;
    }

    if has_content_type(&response, &["application/json", "+json", "text/html"]) {
        return response;
    }

    let status = response.status();
    let (parts, body) = response.into_parts();
    let message = match to_bytes(body, MAX_ERROR_BODY_BYTES).await {
        Ok(bytes) => body_bytes_to_message(status, bytes),
        Err(_) => default_message(status),
    };
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), %message, "request failed");
    }

    let mut new_response = AppError::new(status, message).into_response();
    copy_headers(&parts.headers, &mut new_response);
    new_response
}

fn has_content_type(response: &Response, needles: &[&str]) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            needles.iter().any(|needle| value.contains(needle))
        })
        .unwrap_or(false)
}

fn body_bytes_to_message(status: StatusCode, bytes: Bytes) -> String {
    let message = String::from_utf8_lossy(&bytes).trim().to_string();
    if message.is_empty() {
        return default_message(status);
    }
    message
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

fn copy_headers(src: &HeaderMap, dest: &mut Response) {
    for (name, value) in src {
        if name == header::CONTENT_TYPE || name == header::CONTENT_LENGTH {
            continue;
        }
        dest.headers_mut().insert(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{self, Body},
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    use super::json_error_middleware;
    use crate::error::ErrorBody;

    fn app() -> Router {
        Router::new()
            .route("/plain", get(|| async { (StatusCode::CONFLICT, "already there") }))
            .layer(middleware::from_fn(json_error_middleware))
    }

    async fn error_body(request: Request<Body>) -> (StatusCode, ErrorBody) {
        let response = app().oneshot(request).await.expect("request should succeed");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json error body"))
    }

    #[tokio::test]
    async fn wraps_plain_text_errors() {
        let (status, body) =
            error_body(Request::builder().uri("/plain").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.status_code, 409);
        assert_eq!(body.error, "Conflict");
        assert_eq!(body.message, "already there");
    }

    #[tokio::test]
    async fn wraps_unmatched_routes() {
        let (status, body) =
            error_body(Request::builder().uri("/missing").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Not Found");
    }

    #[tokio::test]
    async fn wraps_wrong_method() {
        let (status, body) = error_body(
            Request::builder()
                .method("DELETE")
                .uri("/plain")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body.status_code, 405);
    }
}
