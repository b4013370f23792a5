pub mod hybrid_search;

use meilimcp_core::metadata::IndexMetadata;
use serde::{Deserialize, Serialize};

/// MCP tool definition for tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Return all tool definitions. Descriptions embed the index's filterable attributes.
pub fn list_tools(metadata: &IndexMetadata) -> Vec<ToolDefinition> {
    vec![hybrid_search::definition(metadata)]
}
