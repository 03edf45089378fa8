pub mod lineage;
pub mod list;

pub use lineage::{GetLineageError, GetLineageQuery};
pub use list::{ListHydrantsError, ListHydrantsQuery};
