//! Shared utilities and types for feature modules
//!
//! - **validation**: Field-level request validation and error collection

pub mod validation;

pub use validation::{parse_id, FieldError, ValidationErrors};
