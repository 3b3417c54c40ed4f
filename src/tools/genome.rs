use super::render;
use crate::align::Aligner;
use crate::catalog::Catalog;
use crate::store::DocumentStore;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenomeSegmentsRequest {
    /// Exact virus name, e.g. "ovine adenovirus 3"
    pub virus_name: String,
}

pub async fn handle_genome_segments<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: GenomeSegmentsRequest,
) -> Result<String, String> {
    render(catalog.genome_segments(&request.virus_name).await)
}
