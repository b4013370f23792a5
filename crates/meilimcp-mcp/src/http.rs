//! HTTP transport for the MCP server.
//!
//! Serves the same dispatch as the stdio loop. Routes:
//! - `GET /health` reports index reachability
//! - `POST /` handles one JSON-RPC message per request

use crate::protocol::{INTERNAL_ERROR, JsonRpcResponse, PARSE_ERROR};
use crate::server::{ServerContext, ServerError, handle_line};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the router; split out so tests can drive handlers without a socket.
pub fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", post(jsonrpc_handler))
        .with_state(ctx)
}

/// Start the HTTP transport server on the given bind address and port.
pub async fn run_http_server(
    ctx: Arc<ServerContext>,
    bind_addr: &str,
    port: u16,
) -> Result<(), ServerError> {
    let app = router(ctx);
    let addr = format!("{}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MCP HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// GET /health
async fn health_handler(State(ctx): State<Arc<ServerContext>>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking({
        let ctx = Arc::clone(&ctx);
        move || build_health_response(&ctx)
    })
    .await;

    match result {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            let body = json!({"error": format!("internal error: {}", e)});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// POST /
async fn jsonrpc_handler(State(ctx): State<Arc<ServerContext>>, body: Bytes) -> impl IntoResponse {
    let line = String::from_utf8_lossy(&body).into_owned();

    let result = tokio::task::spawn_blocking({
        let ctx = Arc::clone(&ctx);
        move || handle_line(&ctx, &line)
    })
    .await;

    match result {
        Ok(Some(response)) => {
            let status = match &response.error {
                Some(err) if err.code == PARSE_ERROR => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            };
            (status, Json(response)).into_response()
        }
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            let resp = JsonRpcResponse::error(None, INTERNAL_ERROR, format!("Internal error: {}", e));
            Json(resp).into_response()
        }
    }
}

fn build_health_response(ctx: &ServerContext) -> Value {
    let meilisearch = match ctx.backend.health() {
        Ok(body) => json!({"reachable": true, "response": body}),
        Err(e) => {
            warn!(error = %e, "meilisearch health check failed");
            json!({"reachable": false, "error": e.to_string()})
        }
    };
    let status = if meilisearch["reachable"] == json!(true) {
        "ok"
    } else {
        "degraded"
    };

    json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "index": ctx.config.index,
        "embedder_configured": ctx.config.embedder.is_some(),
        "filterable_attributes": ctx.metadata.filterable_attributes(),
        "meilisearch": meilisearch,
    })
}
