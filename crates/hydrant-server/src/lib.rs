//! Hydrant Registry Server Library
//!
//! HTTP service for recording fire-hydrant inspections.
//!
//! # Overview
//!
//! Two tables are kept in lockstep:
//!
//! - **hydrants**: one row per live hydrant, holding its current field values
//! - **history**: an append-only ledger of every create, update and delete
//!
//! Each hydrant row points at the ledger entry that produced its values, and
//! each ledger entry points at the one it supersedes. Following those links
//! from any live hydrant ends at exactly one `create` entry.
//!
//! # Architecture
//!
//! Feature slices under [`features`] follow a CQRS layout:
//!
//! - **Commands** (create, update, delete) run in a single transaction that
//!   writes the ledger entry and the hydrant row together
//! - **Queries** (list hydrants, list history, lineage) are read-only
//!
//! # Example
//!
//! ```no_run
//! use hydrant_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     db::run_migrations(&pool).await?;
//!     api::serve(config, pool).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;

pub use error::AppError;
