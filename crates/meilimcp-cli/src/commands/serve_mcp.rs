use anyhow::{Context, Result};
use meilimcp_core::config::Config;
use meilimcp_mcp::ServerContext;
use meilimcp_search::load_index_metadata;
use std::sync::Arc;

fn build_context(config: &Config) -> Result<ServerContext> {
    let (engine, client) = super::connect(config)?;
    let metadata = load_index_metadata(&engine, &client).with_context(|| {
        format!(
            "Failed to load filterable attributes for index '{}'",
            engine.index
        )
    })?;
    Ok(ServerContext::new(engine, metadata, Arc::new(client)))
}

pub fn run(config: &Config) -> Result<()> {
    let ctx = build_context(config)?;
    meilimcp_mcp::server::run_server(&ctx).context("MCP server error")
}

/// Start the MCP server in HTTP transport mode.
pub fn run_http(config: &Config, bind_addr: &str, port: u16) -> Result<()> {
    let ctx = Arc::new(build_context(config)?);

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(meilimcp_mcp::http::run_http_server(ctx, bind_addr, port))
        .context("MCP HTTP server error")
}
