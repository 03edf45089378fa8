pub mod list;

pub use list::{ListHistoryError, ListHistoryQuery};
