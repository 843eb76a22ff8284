//! Dataset registry: the static list of published datasets and the helpers
//! shared by everything that reads it.

pub mod schema;
pub mod store;
pub mod fingerprint;
pub mod listing;

pub use schema::*;
pub use store::*;
pub use fingerprint::*;
pub use listing::*;
