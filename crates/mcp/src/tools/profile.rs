// Profile tools: GitHub and LeetCode statistics with an optional roast

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{
    json_schema_boolean, json_schema_object, json_schema_string, parse_arguments,
    RichToolDescription, Tool, ToolContext,
};
use chrono::Utc;
use devroast_core::github::GitHubClient;
use devroast_core::leetcode::LeetCodeClient;
use devroast_core::roast::RoastGenerator;
use devroast_core::{ProfileReport, ProfileStats, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ProfileArgs {
    username: String,
    #[serde(default = "default_include_roast")]
    include_roast: bool,
}

fn default_include_roast() -> bool {
    true
}

impl ProfileArgs {
    fn parse(tool: &str, arguments: Value) -> ToolResult<Self> {
        let mut args: Self = parse_arguments(tool, arguments)?;
        args.username = args.username.trim().to_string();
        Ok(args)
    }
}

fn profile_input_schema(username_description: &str) -> Value {
    json_schema_object(
        serde_json::json!({
            "username": json_schema_string(username_description),
            "include_roast": json_schema_boolean("Attach a generated roast and improvement tips (default: true)")
        }),
        vec!["username"],
    )
}

/// Roast the stats if asked, then wrap everything as a tool result
async fn respond(
    roaster: &dyn RoastGenerator,
    stats: ProfileStats,
    include_roast: bool,
) -> ToolResult<CallToolResult> {
    let roast = if include_roast {
        tracing::debug!(roaster = roaster.name(), username = stats.username(), "Generating roast");
        Some(roaster.roast(&stats).await?)
    } else {
        None
    };

    let report = ProfileReport::new(stats, roast);
    let value = serde_json::to_value(&report)
        .map_err(|e| ToolError::malformed(format!("could not encode report: {}", e)))?;
    Ok(CallToolResult::structured(value))
}

/// Tool to fetch and roast a GitHub profile
pub struct GitHubProfileTool {
    client: GitHubClient,
    roaster: Arc<dyn RoastGenerator>,
}

impl GitHubProfileTool {
    pub const NAME: &'static str = "get_github_profile_data";

    pub fn new(client: GitHubClient, roaster: Arc<dyn RoastGenerator>) -> Self {
        Self { client, roaster }
    }
}

#[async_trait::async_trait]
impl Tool for GitHubProfileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: RichToolDescription {
                description: "Fetch a GitHub user's public statistics (repos, stars, followers, languages, account age) and roast them",
                use_when: "Use this when the user wants a GitHub profile summarized, reviewed or roasted",
                side_effects: Some("None - read-only calls to the GitHub API"),
            }
            .to_json(),
            input_schema: profile_input_schema("GitHub username (login)"),
        }
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> ToolResult<CallToolResult> {
        let args = ProfileArgs::parse(Self::NAME, arguments)?;
        let stats = self.client.fetch_profile(&args.username, Utc::now()).await?;
        respond(self.roaster.as_ref(), ProfileStats::GitHub(stats), args.include_roast).await
    }
}

/// Tool to fetch and roast a LeetCode profile
pub struct LeetCodeProfileTool {
    client: LeetCodeClient,
    roaster: Arc<dyn RoastGenerator>,
}

impl LeetCodeProfileTool {
    pub const NAME: &'static str = "get_leetcode_profile_data";

    pub fn new(client: LeetCodeClient, roaster: Arc<dyn RoastGenerator>) -> Self {
        Self { client, roaster }
    }
}

#[async_trait::async_trait]
impl Tool for LeetCodeProfileTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.to_string(),
            description: RichToolDescription {
                description: "Fetch a LeetCode user's solved counts per difficulty, acceptance rate and ranking, and roast them",
                use_when: "Use this when the user wants a LeetCode profile summarized, reviewed or roasted",
                side_effects: Some("None - read-only GraphQL query to LeetCode"),
            }
            .to_json(),
            input_schema: profile_input_schema("LeetCode username"),
        }
    }

    async fn execute(&self, _ctx: &ToolContext, arguments: Value) -> ToolResult<CallToolResult> {
        let args = ProfileArgs::parse(Self::NAME, arguments)?;
        let stats = self.client.fetch_profile(&args.username).await?;
        respond(self.roaster.as_ref(), ProfileStats::LeetCode(stats), args.include_roast).await
    }
}
