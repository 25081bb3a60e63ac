use crate::error::{ToolError, ToolResult};
use crate::http::{Headers, HttpClient, HttpMethod};
use crate::normalize::normalize_github;
use crate::types::GitHubProfileStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GitHub caps `per_page` at 100
const PER_PAGE: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Upper bound on repository pages fetched per call
    #[serde(default = "default_max_repo_pages")]
    pub max_repo_pages: u32,

    /// Optional personal access token, raises the anonymous rate limit
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_max_repo_pages() -> u32 {
    10
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            max_repo_pages: default_max_repo_pages(),
            token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: HttpClient,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(http: HttpClient, config: GitHubConfig) -> Self {
        Self { http, config }
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/vnd.github+json".to_string());
        headers.insert("X-GitHub-Api-Version".to_string(), "2022-11-28".to_string());
        if let Some(ref token) = self.config.token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// Fetch the raw `/users/{username}` document
    pub async fn fetch_user(&self, username: &str) -> ToolResult<Value> {
        validate_username(username)?;
        self.http
            .fetch(
                &self.url(&format!("/users/{}", username)),
                HttpMethod::Get,
                &self.headers(),
                None,
            )
            .await
    }

    /// Fetch every owned repository, following pages until a short one
    pub async fn fetch_repos(&self, username: &str) -> ToolResult<Value> {
        validate_username(username)?;
        let headers = self.headers();
        let mut repos = Vec::new();

        for page in 1..=self.config.max_repo_pages.max(1) {
            let url = self.url(&format!(
                "/users/{}/repos?type=owner&per_page={}&page={}",
                username, PER_PAGE, page
            ));
            let batch = match self.http.fetch(&url, HttpMethod::Get, &headers, None).await? {
                Value::Array(batch) => batch,
                other => {
                    return Err(ToolError::malformed(format!(
                        "GitHub repository page {} is not an array: {}",
                        page,
                        type_name(&other)
                    )))
                }
            };

            let done = batch.len() < PER_PAGE;
            repos.extend(batch);
            if done {
                break;
            }
            if page == self.config.max_repo_pages {
                tracing::debug!(username, pages = page, "Repository page limit reached");
            }
        }

        Ok(Value::Array(repos))
    }

    /// Fetch and normalize a profile
    pub async fn fetch_profile(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> ToolResult<GitHubProfileStats> {
        let (user, repos) = tokio::try_join!(self.fetch_user(username), self.fetch_repos(username))?;
        normalize_github(&user, &repos, now)
    }
}

/// GitHub login rules: 1 to 39 ASCII alphanumerics or hyphens, no hyphen at
/// either end
pub fn validate_username(username: &str) -> ToolResult<()> {
    let valid = !username.is_empty()
        && username.len() <= 39
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !username.starts_with('-')
        && !username.ends_with('-');

    if valid {
        Ok(())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "invalid GitHub username: {:?}",
            username
        )))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
