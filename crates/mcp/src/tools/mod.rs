pub mod profile;
pub mod validate;
mod registry;

pub use profile::{GitHubProfileTool, LeetCodeProfileTool};
pub use validate::ValidateTool;
pub use registry::{
    json_schema_boolean, json_schema_object, json_schema_string, parse_arguments,
    RichToolDescription, Tool, ToolContext, ToolDispatcher, ToolRegistry,
};

use devroast_core::auth::AuthGate;
use devroast_core::github::GitHubClient;
use devroast_core::leetcode::LeetCodeClient;
use devroast_core::roast::RoastGenerator;
use std::sync::Arc;

/// Registry holding the three profile-roast tools
pub fn default_registry(
    gate: &AuthGate,
    github: GitHubClient,
    leetcode: LeetCodeClient,
    roaster: Arc<dyn RoastGenerator>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GitHubProfileTool::new(github, roaster.clone())));
    registry.register(Arc::new(LeetCodeProfileTool::new(leetcode, roaster)));
    registry.register(Arc::new(ValidateTool::new(gate.clone())));
    registry
}
