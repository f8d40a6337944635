//! HTTP Middleware
//!
//! 业务错误统一走 `{errno, error, data}` + 200，由 ApiError 记录；
//! 这里只记录框架层拒绝（JSON 解析失败、请求体过大、未知路由）与慢请求。

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// 慢请求阈值（表单提交包含持久化，可能较慢）
pub const SLOW_REQUEST: Duration = Duration::from_secs(2);

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            elapsed_ms,
            "Request rejected"
        );
    } else if started.elapsed() >= SLOW_REQUEST {
        tracing::warn!(method = %method, path = %path, elapsed_ms, "Slow request");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde::Deserialize;
    use tower::util::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        title: String,
    }

    async fn save(Json(_payload): Json<Payload>) -> &'static str {
        "saved"
    }

    async fn broken() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn router() -> Router {
        Router::new()
            .route("/api/manga/save", post(save))
            .route("/api/broken", post(broken))
            .layer(axum::middleware::from_fn(request_logging_middleware))
    }

    fn json_request(uri: &str, body: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_passes_successful_response_through() {
        let response = router()
            .oneshot(json_request("/api/manga/save", r#"{"title":"Akira"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let response = router()
            .oneshot(json_request("/api/manga/save", r#"{"score":3}"#))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_route_and_server_error() {
        let response = router()
            .oneshot(json_request("/api/missing", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router()
            .oneshot(json_request("/api/broken", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
