//! Test helpers for hydrant server integration tests
//!
//! Databases come from `#[sqlx::test(migrations = "../../migrations")]`; these
//! helpers wrap the router and build requests against it.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use hydrant_server::{api, config::Config};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Router plus the pool it was built on
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
}

impl TestApp {
    pub fn new(pool: PgPool) -> Self {
        let router = api::create_router(pool.clone(), &Config::default());
        Self { router, pool }
    }

    /// Sends a request with an optional JSON body and decodes the JSON reply.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let raw = body.map(|v| v.to_string());
        self.send_raw(method, uri, raw.as_deref()).await
    }

    /// Like [`TestApp::send`] but with the body passed through verbatim.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn history_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM history")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
