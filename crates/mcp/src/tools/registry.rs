// MCP tool trait, registry and dispatch

use crate::protocol::{CallToolResult, ToolSchema};
use devroast_core::auth::AuthGate;
use devroast_core::{ToolError, ToolResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Per-invocation context handed to every tool
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Bearer token presented by the caller, if any
    pub bearer: Option<String>,
}

impl ToolContext {
    pub fn with_bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
        }
    }
}

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, ctx: &ToolContext, arguments: Value) -> ToolResult<CallToolResult>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool schemas, ordered by name
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Gates every call through the [`AuthGate`] before running the tool
pub struct ToolDispatcher {
    registry: ToolRegistry,
    gate: AuthGate,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, gate: AuthGate) -> Self {
        Self { registry, gate }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Authorize, look up and run a tool. Errors are returned untouched.
    pub async fn dispatch(
        &self,
        ctx: &ToolContext,
        name: &str,
        arguments: Value,
    ) -> ToolResult<CallToolResult> {
        let call_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("tool_call", tool = %name, %call_id);

        async move {
            self.gate.authorize(ctx.bearer.as_deref())?;

            let tool = self
                .registry
                .get(name)
                .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

            // Clients may omit `arguments` entirely
            let arguments = match arguments {
                Value::Null => Value::Object(Default::default()),
                other => other,
            };

            let started = Instant::now();
            let result = tool.execute(ctx, arguments).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "Tool call completed"),
                Err(e) => tracing::warn!(elapsed_ms, kind = %e.kind(), error = %e, "Tool call failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Parse tool arguments into their typed form
pub fn parse_arguments<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> ToolResult<T> {
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_arguments(format!("{}: {}", tool, e)))
}

/// Tool description carrying when-to-use guidance, encoded as JSON
#[derive(Debug, Clone, Serialize)]
pub struct RichToolDescription<'a> {
    pub description: &'a str,
    pub use_when: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<&'a str>,
}

impl RichToolDescription<'_> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.description.to_string())
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}
