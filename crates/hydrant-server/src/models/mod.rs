//! Database models
//!
//! Row types for the two persisted tables and the validated field set that
//! every write takes as input.

pub mod history;
pub mod hydrant;

pub use history::{HistoryAction, HistoryEntry, UnknownHistoryAction};
pub use hydrant::{HydrantFields, HydrantRecord};
