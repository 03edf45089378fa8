//! The append-only action ledger

pub mod ledger;
pub mod queries;
pub mod routes;

pub use ledger::NewEntry;
pub use queries::{ListHistoryError, ListHistoryQuery};
pub use routes::history_routes;
