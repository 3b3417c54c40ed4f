use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use viro3d_mcp::align::{BlastpAligner, CachedAligner};
use viro3d_mcp::bundle::BundleWriter;
use viro3d_mcp::catalog::Catalog;
use viro3d_mcp::config::Config;
use viro3d_mcp::server::CatalogServer;
use viro3d_mcp::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging goes to stderr; stdout carries the MCP protocol
    viro3d_mcp::tracing::init();

    tracing::info!("Starting viro3d-mcp MCP server");

    let config = Config::load()?;

    let store = MemoryStore::load(&config.data_dir).await?;
    let aligner = CachedAligner::new(
        BlastpAligner::new(
            config.blastp_bin.clone(),
            config.blast_db.clone(),
            config.threads,
            config.max_concurrent_alignments,
        ),
        config.cache_capacity(),
    );
    let bundles = BundleWriter::new(&config.models_dir, &config.bundle_dir);

    let catalog = Catalog::new(Arc::new(store), Arc::new(aligner), bundles);

    let server = CatalogServer::new(catalog);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}
