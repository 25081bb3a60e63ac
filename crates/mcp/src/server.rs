// MCP server: JSON-RPC method routing, transport agnostic

use crate::protocol::{
    negotiate_protocol_version, CallToolParams, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities,
    ServerInfo, ToolsCapability, JSONRPC_VERSION,
};
use crate::tools::{ToolContext, ToolDispatcher};
use serde::Serialize;
use serde_json::Value;

const INSTRUCTIONS: &str = "Fetches public GitHub and LeetCode statistics and roasts them. \
Call `validate` first to confirm the server identity.";

pub struct McpServer {
    dispatcher: ToolDispatcher,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher,
            info: ServerInfo {
                name: "devroast".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications, which get no response.
    pub async fn handle_value(&self, message: Value, ctx: &ToolContext) -> Option<JsonRpcResponse> {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle(request, ctx).await,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed JSON-RPC message");
                Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
            }
        }
    }

    pub async fn handle(&self, request: JsonRpcRequest, ctx: &ToolContext) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %request.method, "MCP request");

        if request.is_notification() {
            // Notifications (initialized, cancelled, ...) need no answer
            tracing::debug!(method = %request.method, "MCP notification");
            return None;
        }

        if !request.has_valid_id() {
            return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::invalid_request()));
        }
        let id = request.id.unwrap_or_default();

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let params = request.params.unwrap_or(Value::Null);
        let result = match request.method.as_str() {
            "initialize" => self.initialize(params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_value(&ListToolsResult {
                tools: self.dispatcher.registry().list_schemas(),
            }),
            "tools/call" => self.call_tool(params, ctx).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Value) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?;

        if let Some(ref client) = params.client_info {
            tracing::info!(client = %client.name, version = %client.version, "MCP client connected");
        }

        to_value(&InitializeResult {
            protocol_version: negotiate_protocol_version(&params.protocol_version).to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.info.clone(),
            instructions: Some(INSTRUCTIONS.to_string()),
        })
    }

    async fn call_tool(&self, params: Value, ctx: &ToolContext) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))?;

        let result = self
            .dispatcher
            .dispatch(ctx, &params.name, params.arguments)
            .await
            .map_err(|e| JsonRpcError::from_tool_error(&e))?;

        to_value(&result)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{default_registry, ToolDispatcher};
    use devroast_core::auth::{AuthConfig, AuthGate};
    use devroast_core::github::{GitHubClient, GitHubConfig};
    use devroast_core::http::{HttpClient, HttpConfig};
    use devroast_core::leetcode::{LeetCodeClient, LeetCodeConfig};
    use devroast_core::roast::TemplateRoaster;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "test-token";

    fn create_server(upstream: &str) -> McpServer {
        let http = HttpClient::new(&HttpConfig::default()).unwrap();
        let gate = AuthGate::new(&AuthConfig {
            token: TOKEN.to_string(),
            validation_id: "919876543210".to_string(),
        });
        let github = GitHubClient::new(
            http.clone(),
            GitHubConfig {
                api_url: upstream.to_string(),
                ..Default::default()
            },
        );
        let leetcode = LeetCodeClient::new(
            http,
            LeetCodeConfig {
                graphql_url: format!("{}/graphql", upstream),
            },
        );
        let registry = default_registry(&gate, github, leetcode, Arc::new(TemplateRoaster::new()));
        McpServer::new(ToolDispatcher::new(registry, gate))
    }

    fn authed() -> ToolContext {
        ToolContext::with_bearer(TOKEN)
    }

    fn call(name: &str, arguments: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        })
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = create_server("http://127.0.0.1:1");
        let response = server
            .handle_value(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "method": "initialize",
                    "params": {
                        "protocolVersion": "2024-11-05",
                        "capabilities": {},
                        "clientInfo": {"name": "test", "version": "1.0"}
                    }
                }),
                &ToolContext::default(),
            )
            .await
            .unwrap();

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "devroast");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let server = create_server("http://127.0.0.1:1");
        let response = server
            .handle_value(
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                &ToolContext::default(),
            )
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_null_id_is_invalid_request() {
        let server = create_server("http://127.0.0.1:1");
        let response = server
            .handle_value(
                json!({"jsonrpc": "2.0", "id": null, "method": "ping"}),
                &ToolContext::default(),
            )
            .await
            .unwrap();

        assert_eq!(response.id, Value::Null);
        assert_eq!(response.error.unwrap().code, -32600);
        assert!(response.result.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = create_server("http://127.0.0.1:1");
        let response = server
            .handle_value(
                json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
                &ToolContext::default(),
            )
            .await
            .unwrap();

        let tools = response.result.unwrap()["tools"].clone();
        let names: Vec<&str> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["get_github_profile_data", "get_leetcode_profile_data", "validate"]
        );
    }

    #[tokio::test]
    async fn test_unknown_method_and_bad_version() {
        let server = create_server("http://127.0.0.1:1");

        let response = server
            .handle_value(
                json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
                &ToolContext::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);

        let response = server
            .handle_value(
                json!({"jsonrpc": "1.0", "id": 4, "method": "ping"}),
                &ToolContext::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32600);

        let response = server
            .handle_value(json!({"id": 5}), &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(response.id, json!(5));
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_validate_tool() {
        let server = create_server("http://127.0.0.1:1");

        let response = server
            .handle_value(call("validate", json!({})), &authed())
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["text"], "919876543210");

        let response = server
            .handle_value(call("validate", json!({})), &ToolContext::with_bearer("nope"))
            .await
            .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32001);
        assert_eq!(error.data.unwrap()["kind"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_unauthorized_call_makes_no_upstream_request() {
        let upstream = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&upstream)
            .await;

        let server = create_server(&upstream.uri());
        let response = server
            .handle_value(
                call("get_github_profile_data", json!({"username": "octocat"})),
                &ToolContext::default(),
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().data.unwrap()["kind"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_upstream_404_surfaces_status() {
        let upstream = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&upstream)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/ghost/repos"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&upstream)
            .await;

        let server = create_server(&upstream.uri());
        let response = server
            .handle_value(
                call("get_github_profile_data", json!({"username": "ghost"})),
                &authed(),
            )
            .await
            .unwrap();

        let error = response.error.unwrap();
        let data = error.data.unwrap();
        assert_eq!(data["kind"], "UpstreamError");
        assert_eq!(data["status"], 404);
    }

    #[tokio::test]
    async fn test_invalid_call_params() {
        let server = create_server("http://127.0.0.1:1");
        let response = server
            .handle_value(
                json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {"arguments": {}}}),
                &authed(),
            )
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
