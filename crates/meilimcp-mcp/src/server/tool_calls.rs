use super::ServerContext;
use crate::protocol::{CallToolResult, INVALID_PARAMS, JsonRpcResponse, TextContent};
use meilimcp_core::constants::{HYBRID_SEARCH_TOOL, NO_RESULTS_MESSAGE};
use meilimcp_core::error::{ProtocolErrorCode, QueryError};
use meilimcp_core::query::build_query;
use meilimcp_search::SearchError;
use serde_json::{Value, json};
use tracing::warn;

pub(super) fn handle_tool_call(
    id: Option<Value>,
    tool_name: &str,
    arguments: &Value,
    ctx: &ServerContext,
) -> JsonRpcResponse {
    match tool_name {
        HYBRID_SEARCH_TOOL => handle_hybrid_search(id, arguments, ctx),
        _ => JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {}", tool_name)),
    }
}

/// Validate arguments, run the search, and shape the hits into a text block.
fn handle_hybrid_search(id: Option<Value>, arguments: &Value, ctx: &ServerContext) -> JsonRpcResponse {
    let query = match build_query(arguments, &ctx.config, &ctx.metadata) {
        Ok(query) => query,
        Err(e) => return query_error_response(id, &e),
    };

    let response = match ctx.backend.search(&query) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "hybrid search failed");
            return search_error_response(id, &e);
        }
    };

    if response.hits.is_empty() {
        return tool_text_response(id, NO_RESULTS_MESSAGE);
    }
    match serde_json::to_string(&response.hits) {
        Ok(text) => tool_text_response(id, text),
        Err(e) => tool_error_response(
            id,
            ProtocolErrorCode::SerializationFailure,
            format!("failed to encode hits: {}", e),
            None,
        ),
    }
}

fn query_error_response(id: Option<Value>, err: &QueryError) -> JsonRpcResponse {
    let data = match err {
        QueryError::MissingConfiguration { key, flag, env } => {
            Some(json!({"key": key, "flag": flag, "env": env}))
        }
        _ => err.field().map(|field| json!({ "field": field })),
    };
    tool_error_response(id, err.code(), err.to_string(), data)
}

fn search_error_response(id: Option<Value>, err: &SearchError) -> JsonRpcResponse {
    let data = match err {
        SearchError::Upstream { status, code, .. } => Some(json!({
            "status": status,
            "meilisearch_code": code,
        })),
        _ => None,
    };
    tool_error_response(id, err.code(), err.to_string(), data)
}

/// Helper: build a failed tool result whose text is `{"error": {...}}`.
fn tool_error_response(
    id: Option<Value>,
    code: ProtocolErrorCode,
    message: impl Into<String>,
    data: Option<Value>,
) -> JsonRpcResponse {
    let mut error_obj = serde_json::Map::new();
    error_obj.insert("code".to_string(), Value::String(code.as_str().to_string()));
    error_obj.insert("message".to_string(), Value::String(message.into()));
    if let Some(d) = data {
        error_obj.insert("data".to_string(), d);
    }
    let payload = json!({ "error": Value::Object(error_obj) });

    tool_result(
        id,
        serde_json::to_string(&payload).unwrap_or_default(),
        true,
    )
}

/// Helper: wrap plain text as a successful MCP tool result.
fn tool_text_response(id: Option<Value>, text: impl Into<String>) -> JsonRpcResponse {
    tool_result(id, text.into(), false)
}

fn tool_result(id: Option<Value>, text: String, is_error: bool) -> JsonRpcResponse {
    let result = CallToolResult {
        content: vec![TextContent::new(text)],
        is_error,
    };
    JsonRpcResponse::success(id, json!(result))
}
