use crate::error::{ToolError, ToolResult};
use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default ceiling for a single outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request headers, unique by name.
pub type Headers = BTreeMap<String, String>;

/// Configuration for the outbound HTTP client.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Ceiling applied to each request, connect through body.
    pub timeout: Duration,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("devroast/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Thin JSON-over-HTTP client. One outbound call per `fetch`, no retries.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> ToolResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ToolError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// `body` is only sent for POST. Non-2xx statuses become
    /// [`ToolError::Upstream`] with the response body preserved.
    pub async fn fetch(
        &self,
        url: &str,
        method: HttpMethod,
        headers: &Headers,
        body: Option<&Value>,
    ) -> ToolResult<Value> {
        let url = parse_url(url)?;
        debug!(method = %method, url = %url, "Upstream request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let (HttpMethod::Post, Some(body)) = (method, body) {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(&url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(&url, e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "Upstream returned non-success status");
            return Err(ToolError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ToolError::malformed(format!("response from {} is not valid JSON: {}", url, e))
        })
    }

    fn map_reqwest_error(&self, url: &Url, err: reqwest::Error) -> ToolError {
        if err.is_timeout() {
            warn!(url = %url, timeout_secs = self.timeout.as_secs(), "Upstream request timed out");
            ToolError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if err.is_builder() {
            ToolError::invalid_arguments(format!("could not build request to {}: {}", url, err))
        } else {
            warn!(url = %url, error = %err, "Upstream request failed");
            ToolError::Transport(err.to_string())
        }
    }
}

fn parse_url(raw: &str) -> ToolResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ToolError::invalid_arguments(format!("invalid URL {}: {}", raw, e)))?;

    // Only allow HTTP/HTTPS
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ToolError::invalid_arguments(format!(
            "only HTTP/HTTPS URLs are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}
