pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateHydrantCommand, CreateHydrantError};
pub use delete::{DeleteHydrantCommand, DeleteHydrantError, DeleteHydrantResponse};
pub use update::{UpdateHydrantCommand, UpdateHydrantError};
