//! HTTP server facade for bookshelf with Axum and JSON error handling.

use anyhow::Context;
use axum::{extract::Request, http::HeaderValue, Router};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::{Timestamp, Uuid};

use bookshelf_db::Db;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

pub use error::AppError;
use router::RouterBuilder;

/// Start the HTTP server with the given module registry
///
/// Runs until Ctrl+C or SIGTERM.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    db: &Db,
) -> anyhow::Result<()> {
    let bind_addr = settings.server.bind_addr();
    tracing::info!("starting HTTP server on {}", bind_addr);

    let app = build_router(registry, settings, db);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", bind_addr))?;

    tracing::info!("HTTP server listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server shutdown complete");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted under `/api`
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, db: &Db) -> Router {
    let mut router_builder = RouterBuilder::new();

    for module in registry.modules() {
        router_builder = router_builder.mount_module(module.name(), module.routes(db));
    }

    router_builder = router_builder
        .nest_api()
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    if settings.server.cors_permissive {
        tracing::warn!("CORS: permissive mode enabled, all origins allowed");
        router_builder = router_builder.with_cors();
    }

    router_builder.build()
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, starting shutdown"),
        _ = terminate => tracing::info!("received SIGTERM, starting shutdown"),
    }
}

/// Request ID generator producing time-ordered UUIDv7 values
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
