//! Server-level routes: banner, health probe, unknown paths

use axum::http::{Method, StatusCode};
use sqlx::PgPool;

mod helpers;
use helpers::TestApp;

#[sqlx::test(migrations = "../../migrations")]
async fn test_root_banner(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app.send(Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Hydrant Registry");
    assert_eq!(body["status"], "running");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_health_with_database(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_health_after_pool_closed(pool: PgPool) {
    let app = TestApp::new(pool.clone());
    pool.close().await;

    let (status, body) = app.send(Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_unknown_route(pool: PgPool) {
    let app = TestApp::new(pool);

    let (status, body) = app.send(Method::GET, "/api/pumps", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
