use clap::Parser;
use mkn_mcp::cli::Cli;
use mkn_mcp::server::{MknServer, expand_tilde};
use mkn_mcp::state::MknState;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    mkn_mcp::tracing::init_with(cli.log_format);

    tracing::info!("Starting mkn-mcp MCP server");

    let state = Arc::new(MknState::new(cli.cache_capacity));

    // A missing or broken file is not fatal; tools report no data until one is loaded
    match cli.claml.as_deref() {
        Some(path) => {
            let path = PathBuf::from(expand_tilde(path).as_ref());
            if let Err(e) = state.load_file(&path).await {
                tracing::warn!("Starting without classification data: {:#}", e);
            }
        }
        None => tracing::info!("No ClaML file configured; use load_classification to load one"),
    }

    // Create and serve the MCP server over stdio
    let server = MknServer::new(state);
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;

    Ok(())
}
