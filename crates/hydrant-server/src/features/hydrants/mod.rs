//! Live hydrant records and the commands that change them
//!
//! Every command writes the hydrant row and its ledger entry in one
//! transaction; see [`crate::features::history::ledger`].

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateHydrantCommand, CreateHydrantError, DeleteHydrantCommand, DeleteHydrantError,
    DeleteHydrantResponse, UpdateHydrantCommand, UpdateHydrantError,
};
pub use queries::{GetLineageError, GetLineageQuery, ListHydrantsError, ListHydrantsQuery};
pub use routes::hydrants_routes;
pub use types::HydrantPayload;
