pub mod doctor;
pub mod search;
pub mod serve_mcp;

use anyhow::{Context, Result};
use meilimcp_core::config::{Config, EngineConfig};
use meilimcp_search::MeiliClient;

/// Resolve the startup snapshot and a client for it. Missing host or index fails here.
pub(crate) fn connect(config: &Config) -> Result<(EngineConfig, MeiliClient)> {
    let engine = EngineConfig::from_config(config).context("Invalid Meilisearch configuration")?;
    let client = MeiliClient::new(&engine).context("Failed to build Meilisearch client")?;
    Ok((engine, client))
}
