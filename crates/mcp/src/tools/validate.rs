// Token validation tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_object, json_schema_string, parse_arguments, RichToolDescription, Tool,
    ToolContext,
};
use devroast_core::auth::AuthGate;
use devroast_core::ToolResult;
use serde::Deserialize;
use serde_json::Value;

/// Answers with the configured validation identifier.
///
/// The bearer token has already passed the dispatcher's gate; an explicit
/// `token` argument must pass it as well.
pub struct ValidateTool {
    gate: AuthGate,
}

impl ValidateTool {
    pub const NAME: &'static str = "validate";

    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValidateArgs {
    #[serde(default)]
    token: Option<String>,
}

#[async_trait::async_trait]
impl Tool for ValidateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: RichToolDescription {
                description: "Validate an authentication token and return the server's validation identifier",
                use_when: "Use this when the client needs to confirm it is talking to the right server",
                side_effects: None,
            }
            .to_json(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "token": json_schema_string("Token to check (default: the bearer token of this request)")
                }),
                vec![],
            ),
        }
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> ToolResult<CallToolResult> {
        let args: ValidateArgs = parse_arguments(Self::NAME, arguments)?;

        if let Some(ref token) = args.token {
            self.gate.authorize(Some(token.as_str()))?;
        }

        Ok(CallToolResult::text(self.gate.validation_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devroast_core::auth::AuthConfig;
    use devroast_core::ToolError;
    use serde_json::json;

    fn tool() -> ValidateTool {
        ValidateTool::new(AuthGate::new(&AuthConfig {
            token: "secret".to_string(),
            validation_id: "919876543210".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_validate_returns_identifier() {
        let result = tool().execute(&ToolContext::default(), json!({})).await.unwrap();
        assert_eq!(result.content[0].as_text(), "919876543210");
    }

    #[tokio::test]
    async fn test_validate_explicit_token() {
        let ok = tool()
            .execute(&ToolContext::default(), json!({"token": "secret"}))
            .await
            .unwrap();
        assert_eq!(ok.content[0].as_text(), "919876543210");

        for bad in ["", "secre", "secret!", "a much longer token than the secret"] {
            let err = tool()
                .execute(&ToolContext::default(), json!({"token": bad}))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Unauthorized), "token {:?}", bad);
        }
    }
}
