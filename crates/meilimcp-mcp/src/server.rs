use crate::prompts;
use crate::protocol::{
    INVALID_PARAMS, INVALID_REQUEST, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND,
    PARSE_ERROR,
};
use crate::tools;
use meilimcp_core::config::EngineConfig;
use meilimcp_core::constants;
use meilimcp_core::metadata::IndexMetadata;
use meilimcp_search::SearchBackend;
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

mod tool_calls;


/// Read-only state shared by every request, resolved once at startup.
pub struct ServerContext {
    pub config: EngineConfig,
    pub metadata: IndexMetadata,
    pub backend: Arc<dyn SearchBackend>,
}

impl ServerContext {
    pub fn new(
        config: EngineConfig,
        metadata: IndexMetadata,
        backend: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            config,
            metadata,
            backend,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Run the MCP server loop on stdin/stdout.
pub fn run_server(ctx: &ServerContext) -> Result<(), ServerError> {
    info!(
        index = %ctx.config.index,
        filterable_attributes = ctx.metadata.filterable_attributes().len(),
        "MCP server started on stdio"
    );
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve_lines(ctx, stdin.lock(), stdout.lock())
}

/// Line-delimited JSON-RPC loop over any reader/writer pair. A line that is
/// not valid UTF-8 gets a parse error and the loop keeps reading; a failed
/// read ends the loop with an error.
pub fn serve_lines<R: BufRead, W: Write>(
    ctx: &ServerContext,
    mut reader: R,
    mut writer: W,
) -> Result<(), ServerError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("stdin read error: {}", e);
                return Err(ServerError::Io(e));
            }
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(ctx, line),
            Err(e) => {
                warn!(error = %e, "message is not valid UTF-8");
                Some(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
            }
        };
        if let Some(response) = response {
            write_response(&mut writer, &response)?;
        }
    }

    info!("MCP server input closed, shutting down");
    Ok(())
}

/// Decode one raw message and dispatch it. Malformed JSON yields a parse
/// error; well-formed JSON that is not a request yields an invalid request.
pub fn handle_line(ctx: &ServerContext, line: &str) -> Option<JsonRpcResponse> {
    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to parse JSON-RPC message");
            return Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };
    let id = raw.get("id").cloned().filter(|v| !v.is_null());

    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return Some(JsonRpcResponse::error(
                id,
                INVALID_REQUEST,
                format!("Invalid request: {}", e),
            ));
        }
    };
    handle_request(&request, ctx)
}

fn write_response<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> Result<(), ServerError> {
    let serialized = serde_json::to_string(response)?;
    writeln!(writer, "{}", serialized)?;
    writer.flush()?;
    Ok(())
}

/// Dispatch one request. Notifications never produce a response.
pub fn handle_request(request: &JsonRpcRequest, ctx: &ServerContext) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            request.id.clone(),
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", request.jsonrpc),
        ));
    }

    if request.is_notification() {
        debug!(method = %request.method, "received notification");
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, initialize_result()),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => {
            let tools = tools::list_tools(&ctx.metadata);
            JsonRpcResponse::success(id, json!({ "tools": tools }))
        }
        "tools/call" => {
            let Some(tool_name) = request.param_str("name") else {
                return Some(JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "Missing tool name".into(),
                ));
            };
            let arguments = request
                .params
                .get("arguments")
                .cloned()
                .unwrap_or(json!({}));
            tool_calls::handle_tool_call(id, tool_name, &arguments, ctx)
        }
        "prompts/list" => {
            let prompts = prompts::list_prompts();
            JsonRpcResponse::success(id, json!({ "prompts": prompts }))
        }
        "prompts/get" => handle_get_prompt(request),
        _ => JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    };
    Some(response)
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": constants::MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": {},
            "prompts": {},
            "logging": {}
        },
        "serverInfo": {
            "name": constants::SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn handle_get_prompt(request: &JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();
    let Some(name) = request.param_str("name") else {
        return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing prompt name".into());
    };
    let arguments = request
        .params
        .get("arguments")
        .cloned()
        .unwrap_or(json!({}));

    match prompts::get_prompt(name, &arguments) {
        Some(result) => JsonRpcResponse::success(id, json!(result)),
        None => JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown prompt: {}", name)),
    }
}
