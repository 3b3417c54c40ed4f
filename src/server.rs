//! MCP server exposing the catalog as tools.

use crate::align::{BlastpAligner, CachedAligner};
use crate::catalog::Catalog;
use crate::store::MemoryStore;
use crate::tools::{
    ExportBundleRequest, GenbankIdRequest, GenomeSegmentsRequest, ListVirusesRequest,
    ProteinNameRequest, RecordIdRequest, SequenceRequest, SimilarStructuresRequest,
    VirusNameRequest, handle_export_bundle, handle_genome_segments, handle_get_record,
    handle_list_viruses, handle_search_genbank_id, handle_search_protein_name,
    handle_search_virus_name, handle_sequence_search, handle_similar_structures,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// The catalog as served in production: JSON exports in memory, cached blastp.
pub type ServedCatalog = Catalog<MemoryStore, CachedAligner<BlastpAligner>>;

/// MCP Server for viral protein structure queries
#[derive(Clone)]
pub struct CatalogServer {
    catalog: ServedCatalog,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for CatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogServer")
            .field("catalog", &self.catalog)
            .finish()
    }
}

#[tool_router]
impl CatalogServer {
    pub fn new(catalog: ServedCatalog) -> Self {
        Self {
            catalog,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Search predicted protein structures by curated protein name (case-insensitive substring). Results are ranked by relevance to the query; total_count counts all matches before pagination."
    )]
    async fn search_protein_name(
        &self,
        Parameters(request): Parameters<ProteinNameRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_protein_name(&self.catalog, request).await
    }

    #[tool(
        description = "Search protein structures by GenBank protein id (case-insensitive substring). Results keep catalog order."
    )]
    async fn search_genbank_id(
        &self,
        Parameters(request): Parameters<GenbankIdRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_genbank_id(&self.catalog, request).await
    }

    #[tool(
        description = "Search protein structures by virus name or abbreviation, ranked by relevance. Set exact=true to fetch the structures of one exact virus name (e.g. a suggestion returned by list_viruses)."
    )]
    async fn search_virus_name(
        &self,
        Parameters(request): Parameters<VirusNameRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_virus_name(&self.catalog, request).await
    }

    #[tool(
        description = "Autocomplete virus names: distinct virus names whose name, abbreviation or species matches the query, most relevant first."
    )]
    async fn list_viruses(
        &self,
        Parameters(request): Parameters<ListVirusesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_viruses(&self.catalog, request).await
    }

    #[tool(description = "Fetch a single protein structure record by its record id.")]
    async fn get_record(
        &self,
        Parameters(request): Parameters<RecordIdRequest>,
    ) -> std::result::Result<String, String> {
        handle_get_record(&self.catalog, request).await
    }

    #[tool(
        description = "Find structures similar in sequence to a protein sequence using blastp. Matches are sorted by e-value, most significant first, and joined to their structure records."
    )]
    async fn sequence_search(
        &self,
        Parameters(request): Parameters<SequenceRequest>,
    ) -> std::result::Result<String, String> {
        handle_sequence_search(&self.catalog, request).await
    }

    #[tool(
        description = "List the genome segments carrying proteins of an exact virus name, with protein coordinates, in natural segment order."
    )]
    async fn genome_segments(
        &self,
        Parameters(request): Parameters<GenomeSegmentsRequest>,
    ) -> std::result::Result<String, String> {
        handle_genome_segments(&self.catalog, request).await
    }

    #[tool(
        description = "Find clusters of structurally similar models that contain a member matching a GenBank id."
    )]
    async fn similar_structures(
        &self,
        Parameters(request): Parameters<SimilarStructuresRequest>,
    ) -> std::result::Result<String, String> {
        handle_similar_structures(&self.catalog, request).await
    }

    #[tool(
        description = "Write a zip bundle of predicted model files plus a CSV metadata sheet for one virus or one cluster. Returns the archive path and its entries.",
        input_schema = inline_schema_for_type::<ExportBundleRequest>()
    )]
    async fn export_bundle(
        &self,
        Parameters(request): Parameters<ExportBundleRequest>,
    ) -> std::result::Result<String, String> {
        handle_export_bundle(&self.catalog, request).await
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "viro3d-mcp: search predicted viral protein structures by protein name, \
                 GenBank id, virus name or sequence similarity; look up genome coordinates \
                 and structurally similar clusters; export model bundles as zip archives. \
                 Paged tools take page_size and page_num together.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline enum definitions instead of $ref patterns. This ensures MCP Inspector
/// displays enums as dropdown widgets rather than raw JSON input fields.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        other => {
            tracing::error!(?other, "Schema serialization produced a non-object value");
            Arc::new(JsonObject::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::BundleWriter;
    use crate::store::MemoryStore;
    use assert2::check;
    use std::num::NonZeroUsize;
    use std::path::PathBuf;

    fn server() -> CatalogServer {
        let aligner = CachedAligner::new(
            BlastpAligner::new(PathBuf::from("blastp"), PathBuf::from("db"), 1, 1),
            NonZeroUsize::new(1).unwrap(),
        );
        CatalogServer::new(Catalog::new(
            Arc::new(MemoryStore::new(Vec::new(), Vec::new(), Vec::new())),
            Arc::new(aligner),
            BundleWriter::new("models", "bundles"),
        ))
    }

    #[test]
    fn info_advertises_tools_and_instructions() {
        let info = server().get_info();

        check!(info.capabilities.tools.is_some());
        check!(info.protocol_version == ProtocolVersion::V_2024_11_05);
        check!(info.instructions.as_deref().is_some_and(|text| text.contains("page_size")));
    }

    #[test]
    fn bundle_schema_inlines_source_enum() {
        let schema = inline_schema_for_type::<ExportBundleRequest>();
        let rendered = serde_json::to_string(&schema).unwrap();

        check!(!rendered.contains("$ref"));
        check!(rendered.contains("\"virus\""));
        check!(rendered.contains("\"cluster\""));
    }
}
