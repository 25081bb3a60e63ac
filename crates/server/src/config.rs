use anyhow::{bail, Context, Result};
use devroast_core::auth::{AuthConfig, AuthGate};
use devroast_core::github::{GitHubClient, GitHubConfig};
use devroast_core::http::{HttpClient, HttpConfig};
use devroast_core::leetcode::{LeetCodeClient, LeetCodeConfig};
use devroast_core::roast::{ChatRoaster, RoastConfig, RoastGenerator, RoastProvider, TemplateRoaster};
use devroast_mcp::tools::{default_registry, ToolDispatcher};
use devroast_mcp::McpServer;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Non-secret settings, read from the optional TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub leetcode: LeetCodeConfig,

    #[serde(default)]
    pub roast: RoastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        if config.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be greater than zero");
        }

        Ok(config)
    }
}

/// Secrets taken from the environment, never from the config file
#[derive(Clone)]
pub struct Secrets {
    pub auth: AuthConfig,
    pub github_token: Option<String>,
    pub roast_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = non_empty("AUTH_TOKEN").context("AUTH_TOKEN must be set (env or .env file)")?;
        let validation_id = non_empty("MY_NUMBER").context("MY_NUMBER must be set (env or .env file)")?;

        Ok(Self {
            auth: AuthConfig {
                token,
                validation_id,
            },
            github_token: non_empty("GITHUB_TOKEN"),
            roast_api_key: non_empty("ROAST_API_KEY"),
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
}

impl AppState {
    pub fn new(config: &ServerConfig, secrets: Secrets) -> Result<Self> {
        let http = HttpClient::new(&HttpConfig {
            timeout: Duration::from_secs(config.http.timeout_secs),
            ..Default::default()
        })
        .context("Failed to create HTTP client")?;

        let gate = AuthGate::new(&secrets.auth);

        let github = GitHubClient::new(
            http.clone(),
            GitHubConfig {
                token: secrets.github_token,
                ..config.github.clone()
            },
        );
        let leetcode = LeetCodeClient::new(http.clone(), config.leetcode.clone());

        let roaster: Arc<dyn RoastGenerator> = match config.roast.provider {
            RoastProvider::Template => Arc::new(TemplateRoaster::new()),
            RoastProvider::Chat => {
                let api_key = secrets
                    .roast_api_key
                    .context("roast.provider = \"chat\" requires ROAST_API_KEY")?;
                Arc::new(ChatRoaster::new(http, &config.roast, api_key))
            }
        };
        tracing::info!(roaster = roaster.name(), "Roast generator ready");

        let registry = default_registry(&gate, github, leetcode, roaster);
        tracing::info!("Registered {} tools", registry.len());

        Ok(Self {
            mcp: Arc::new(McpServer::new(ToolDispatcher::new(registry, gate))),
        })
    }
}
