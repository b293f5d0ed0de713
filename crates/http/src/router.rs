//! Router builder for the bookshelf HTTP server

use axum::{error_handling::HandleErrorLayer, BoxError, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{AppError, MakeRequestUuidV7};

/// Builder for constructing the main HTTP router
///
/// Mount routes before adding layers: a layer only wraps the routes that
/// exist when it is applied.
pub struct RouterBuilder {
    router: Router,
    api: Router,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            api: Router::new(),
        }
    }

    /// Merge a module's router into the shared `/api` tree
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        tracing::info!(module = module_name, "mounting module routes under /api");
        self.api = self.api.merge(module_router);
        self
    }

    /// Nest everything mounted so far under `/api`
    pub fn nest_api(mut self) -> Self {
        let api = std::mem::take(&mut self.api);
        self.router = self.router.nest("/api", api);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add permissive CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.router = self.router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
        self
    }

    /// Add request ID middleware; the id is echoed back in the response
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware; an expired request answers 408 with a JSON error body
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_millis(timeout_ms)),
        );
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

async fn handle_timeout_error(error: BoxError) -> AppError {
    if error.is::<Elapsed>() {
        AppError::timeout()
    } else {
        tracing::error!(%error, "unhandled middleware error");
        AppError::internal("Internal server error")
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn books_router() -> Router {
        Router::new().route("/get_all_books", get(|| async { "books" }))
    }

    #[tokio::test]
    async fn test_module_mounting_under_api() {
        let router = RouterBuilder::new()
            .mount_module("books", books_router())
            .nest_api()
            .build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/get_all_books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let router = RouterBuilder::new()
            .mount_module("books", books_router())
            .nest_api()
            .build();

        let response = router
            .oneshot(Request::builder().uri("/books").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .mount_module("books", books_router())
            .nest_api()
            .with_tracing()
            .with_cors()
            .with_request_id()
            .with_timeout(5000)
            .build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/get_all_books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_slow_handler_times_out_with_json_body() {
        let slow = Router::new().route(
            "/get_all_books",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "books"
            }),
        );
        let router = RouterBuilder::new()
            .mount_module("books", slow)
            .nest_api()
            .with_timeout(10)
            .build();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/get_all_books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Request timed out"}));
    }

    #[tokio::test]
    async fn test_non_timeout_middleware_error_is_500() {
        let error: BoxError = "boom".into();
        assert_eq!(
            handle_timeout_error(error).await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
