pub mod align;
pub mod bundle;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod search;
pub mod server;
pub mod store;
pub mod tools;
pub mod tracing;

pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use search::{Page, RankedResultPage};
