//! Canonical schema model and the aggregator that builds it

mod builder;
mod schema;

pub use builder::{build_database, RawCatalog};
pub use schema::*;
