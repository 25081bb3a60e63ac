use crate::config::AppState;
use crate::middleware::auth::extract_bearer;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use devroast_mcp::protocol::{JsonRpcError, JsonRpcResponse};
use devroast_mcp::tools::ToolContext;
use serde_json::Value;
use std::sync::Arc;

/// POST /mcp - one JSON-RPC message per request
pub async fn mcp(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let message: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Rejecting unparseable MCP body: {}", e);
            let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error());
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let ctx = ToolContext {
        bearer: extract_bearer(&headers),
    };

    match state.mcp.handle_value(message, &ctx).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
