//! Tool request types and handlers.
//!
//! Handlers take the [`Catalog`](crate::catalog::Catalog) plus a deserialized
//! request and return the JSON rendering of the typed response, or the error
//! message shown to the caller.

pub mod bundles;
pub mod clusters;
pub mod genome;
pub mod proteins;
pub mod viruses;

pub use bundles::*;
pub use clusters::*;
pub use genome::*;
pub use proteins::*;
pub use viruses::*;

use crate::error::CatalogError;
use serde::Serialize;

/// Render a catalog result for the protocol layer.
pub(crate) fn render<T: Serialize>(result: Result<T, CatalogError>) -> Result<String, String> {
    let value = result.map_err(|e| {
        if matches!(e, CatalogError::Upstream(_)) {
            tracing::error!(error = %e, "Catalog request failed");
        }
        e.to_string()
    })?;
    serde_json::to_string_pretty(&value).map_err(|e| format!("Failed to render response: {}", e))
}
