use super::render;
use crate::align::Aligner;
use crate::catalog::Catalog;
use crate::store::DocumentStore;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SimilarStructuresRequest {
    /// GenBank id (or record id fragment) of a cluster member; case-sensitive
    pub genbank_id: String,
}

pub async fn handle_similar_structures<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: SimilarStructuresRequest,
) -> Result<String, String> {
    render(catalog.clusters_for_genbank_id(&request.genbank_id).await)
}
