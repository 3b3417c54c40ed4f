use super::render;
use crate::align::Aligner;
use crate::catalog::Catalog;
use crate::search::Page;
use crate::store::DocumentStore;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListVirusesRequest {
    /// Partial virus name, abbreviation or species (case-insensitive)
    pub qualifier: String,
    pub page_size: Option<u32>,
    pub page_num: Option<i64>,
}

/// Autocomplete listing of distinct virus names, most relevant first.
pub async fn handle_list_viruses<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: ListVirusesRequest,
) -> Result<String, String> {
    let page = Page::from_params(request.page_size, request.page_num);
    render(catalog.list_viruses(&request.qualifier, page).await)
}
