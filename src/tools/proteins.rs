//! Protein structure lookups: by name, GenBank id, virus, record id and sequence.

use super::render;
use crate::align::Aligner;
use crate::catalog::Catalog;
use crate::search::Page;
use crate::store::DocumentStore;
use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProteinNameRequest {
    /// Text to look for in curated protein names (case-insensitive)
    pub qualifier: String,
    /// Results per page; pagination applies only together with page_num
    pub page_size: Option<u32>,
    /// 1-based page number
    pub page_num: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenbankIdRequest {
    /// GenBank protein id or a fragment of one, e.g. "AFO67214"
    pub qualifier: String,
    pub page_size: Option<u32>,
    pub page_num: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct VirusNameRequest {
    /// Text to look for in virus names and abbreviations (case-insensitive)
    pub qualifier: String,
    pub page_size: Option<u32>,
    pub page_num: Option<i64>,
    /// Match the virus name exactly instead of searching, as after picking a
    /// suggestion from list_viruses
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecordIdRequest {
    /// Record id of the structure, e.g. "AFO67214.1_12633"
    pub record_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SequenceRequest {
    /// Protein sequence in one-letter amino acid codes, no whitespace
    pub sequence: String,
    pub page_size: Option<u32>,
    pub page_num: Option<i64>,
}

pub async fn handle_search_protein_name<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: ProteinNameRequest,
) -> Result<String, String> {
    let page = Page::from_params(request.page_size, request.page_num);
    render(catalog.search_protein_name(&request.qualifier, page).await)
}

pub async fn handle_search_genbank_id<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: GenbankIdRequest,
) -> Result<String, String> {
    let page = Page::from_params(request.page_size, request.page_num);
    render(catalog.search_genbank_id(&request.qualifier, page).await)
}

pub async fn handle_search_virus_name<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: VirusNameRequest,
) -> Result<String, String> {
    let page = Page::from_params(request.page_size, request.page_num);
    if request.exact {
        render(catalog.virus_structures(&request.qualifier, page).await)
    } else {
        render(catalog.search_virus_name(&request.qualifier, page).await)
    }
}

pub async fn handle_get_record<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: RecordIdRequest,
) -> Result<String, String> {
    render(catalog.get_record(&request.record_id).await)
}

pub async fn handle_sequence_search<S: DocumentStore, A: Aligner>(
    catalog: &Catalog<S, A>,
    request: SequenceRequest,
) -> Result<String, String> {
    let page = Page::from_params(request.page_size, request.page_num);
    render(catalog.sequence_search(&request.sequence, page).await)
}
