//! Feature modules implementing the hydrant API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes. Commands and queries implement `mediator::Request`, so they can be
//! dispatched through [`crate::cqrs::build_mediator`] as well as called
//! directly by the HTTP handlers.
//!
//! # Features
//!
//! - **hydrants**: Live hydrant records (create, list, update, delete, lineage)
//! - **history**: The append-only ledger of every hydrant action

pub mod history;
pub mod hydrants;
pub mod shared;

use axum::Router;
use sqlx::PgPool;

/// Creates the API router with all feature routes mounted
///
/// - `/hydrants` - Hydrant records and per-hydrant lineage
/// - `/history` - The full ledger
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest("/hydrants", hydrants::hydrants_routes().with_state(pool.clone()))
        .nest("/history", history::history_routes().with_state(pool))
}
