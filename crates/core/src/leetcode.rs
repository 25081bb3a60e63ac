use crate::error::{ToolError, ToolResult};
use crate::http::{Headers, HttpClient, HttpMethod};
use crate::normalize::normalize_leetcode;
use crate::types::LeetCodeProfileStats;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const PROFILE_QUERY: &str = r#"
query userProfile($username: String!) {
  matchedUser(username: $username) {
    username
    profile {
      ranking
    }
    submitStats {
      acSubmissionNum {
        difficulty
        count
        submissions
      }
      totalSubmissionNum {
        difficulty
        count
        submissions
      }
    }
  }
}
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeetCodeConfig {
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
}

fn default_graphql_url() -> String {
    "https://leetcode.com/graphql".to_string()
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    http: HttpClient,
    config: LeetCodeConfig,
}

impl LeetCodeClient {
    pub fn new(http: HttpClient, config: LeetCodeConfig) -> Self {
        Self { http, config }
    }

    /// Run the profile query and return the raw GraphQL response body
    pub async fn fetch_stats(&self, username: &str) -> ToolResult<Value> {
        validate_username(username)?;

        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Referer".to_string(), "https://leetcode.com".to_string());

        let payload = json!({
            "operationName": "userProfile",
            "query": PROFILE_QUERY,
            "variables": { "username": username },
        });

        self.http
            .fetch(&self.config.graphql_url, HttpMethod::Post, &headers, Some(&payload))
            .await
    }

    /// Fetch and normalize a profile
    pub async fn fetch_profile(&self, username: &str) -> ToolResult<LeetCodeProfileStats> {
        let raw = self.fetch_stats(username).await?;
        normalize_leetcode(&raw)
    }
}

/// LeetCode handles are short and never contain whitespace
pub fn validate_username(username: &str) -> ToolResult<()> {
    let valid = !username.is_empty()
        && username.chars().count() <= 64
        && !username.chars().any(|c| c.is_whitespace() || c.is_control());

    if valid {
        Ok(())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "invalid LeetCode username: {:?}",
            username
        )))
    }
}
