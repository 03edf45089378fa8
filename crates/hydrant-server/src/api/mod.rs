//! HTTP surface: router assembly, server-level handlers and the serve loop

pub mod response;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::features;
use crate::middleware;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use sqlx::PgPool;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;
use tower_http::compression::CompressionLayer;

/// Application state shared across server-level handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

/// Binds the listener and serves until a shutdown signal arrives.
///
/// In-flight requests get `shutdown_timeout_secs` to finish; after that the
/// server stops regardless and the pool is closed.
pub async fn serve(config: Config, pool: PgPool) -> anyhow::Result<()> {
    let app = create_router(pool.clone(), &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let signalled = signalled.clone();
            async move {
                shutdown_signal().await;
                signalled.notify_one();
            }
        })
        .into_future();

    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = server => result?,
        _ = async {
            signalled.notified().await;
            tracing::info!("Waiting up to {} seconds for connections to close", grace.as_secs());
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!("Shutdown grace period elapsed with requests still in flight");
        },
    }

    pool.close().await;
    tracing::info!("Server shut down");

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(pool: PgPool, config: &Config) -> Router {
    let state = AppState { db: pool.clone() };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api", features::router(pool))
        .fallback(fallback)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Hydrant Registry",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    db::health_check(&state.db)
        .await
        .map_err(|e| AppError::Unavailable(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "database": "connected"
        })),
    ))
}

async fn fallback() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
