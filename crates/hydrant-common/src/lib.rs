//! Hydrant Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Process-level plumbing shared by the hydrant binaries.
//!
//! - **Logging**: `tracing` subscriber setup driven by environment variables
//!
//! # Example
//!
//! ```no_run
//! use hydrant_common::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env().unwrap_or_default();
//! let _guard = init_logging(&config);
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LoggingGuard};
