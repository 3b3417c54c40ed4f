//! Model bundle exports.

use super::render;
use crate::align::Aligner;
use crate::catalog::Catalog;
use crate::store::DocumentStore;
use rmcp::schemars;
use serde::Deserialize;

/// What to bundle.
///
/// DO NOT add doc comments to individual variants - this causes schemars to generate
/// `oneOf` with `const` instead of a simple `enum` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BundleSource {
    Virus,
    Cluster,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportBundleRequest {
    /// Bundle every structure of one virus, or every member of one cluster
    pub source: BundleSource,
    /// Exact virus name, or cluster id (the representative model, e.g. "CF-AFU07689.1_4668_relaxed")
    pub qualifier: String,
    /// Model file suffix: ".cif" or "_relaxed.pdb"
    pub format: String,
}

pub async fn handle_export_bundle<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: ExportBundleRequest,
) -> Result<String, String> {
    let result = match request.source {
        BundleSource::Virus => {
            catalog
                .export_virus_bundle(&request.qualifier, &request.format)
                .await
        }
        BundleSource::Cluster => {
            catalog
                .export_cluster_bundle(&request.qualifier, &request.format)
                .await
        }
    };
    render(result)
}
