use crate::error::{ToolError, ToolResult};
use crate::http::{Headers, HttpClient, HttpMethod};
use crate::types::{GitHubProfileStats, LeetCodeProfileStats, ProfileStats, RoastResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Produces commentary for a profile. Output is best-effort creative text.
#[async_trait::async_trait]
pub trait RoastGenerator: Send + Sync {
    async fn roast(&self, stats: &ProfileStats) -> ToolResult<RoastResult>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoastProvider {
    #[default]
    Template,
    Chat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastConfig {
    #[serde(default)]
    pub provider: RoastProvider,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_chat_api_url")]
    pub api_url: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_chat_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for RoastConfig {
    fn default() -> Self {
        Self {
            provider: RoastProvider::Template,
            api_url: default_chat_api_url(),
            model: default_chat_model(),
            api_key: None,
        }
    }
}

/// Rule-based roaster. Same stats, same roast.
#[derive(Debug, Clone, Default)]
pub struct TemplateRoaster;

impl TemplateRoaster {
    pub fn new() -> Self {
        Self
    }

    fn roast_github(stats: &GitHubProfileStats) -> RoastResult {
        let mut lines = Vec::new();
        let mut tips = Vec::new();

        if stats.public_repos == 0 {
            lines.push(format!(
                "{} has zero public repos. Bold strategy: nobody can criticize code they can't see.",
                stats.username
            ));
            tips.push("Push one small finished project instead of keeping everything private.".to_string());
        } else if stats.total_stars == 0 {
            lines.push(format!(
                "{} public repos and not a single star. Not even a pity star from a relative.",
                stats.public_repos
            ));
            tips.push("Write a README with a screenshot; people star what they understand.".to_string());
        } else if stats.total_stars < stats.public_repos {
            lines.push(format!(
                "{} stars spread over {} repos. That's less than one star per repo, the GitHub equivalent of a participation trophy.",
                stats.total_stars, stats.public_repos
            ));
            tips.push("Archive the abandoned experiments and pin your best work.".to_string());
        } else {
            lines.push(format!(
                "{} stars. Respectable, assuming they aren't all from your alt accounts.",
                stats.total_stars
            ));
        }

        if stats.following > stats.followers {
            lines.push(format!(
                "You follow {} people and {} follow you back. Networking or a cry for help?",
                stats.following, stats.followers
            ));
            tips.push("Contribute to projects you admire; followers come from visible work, not follow-backs.".to_string());
        }

        match stats.primary_languages.as_slice() {
            [] => {
                lines.push("Not one repo declares a language. Are these just README files?".to_string());
                tips.push("Ship code, not only markdown.".to_string());
            }
            [only] => {
                lines.push(format!(
                    "Everything is {}. When all you have is a hammer...",
                    only.language
                ));
                tips.push(format!(
                    "Build something outside {} to stretch your range.",
                    only.language
                ));
            }
            [first, ..] if first.repos * 2 > stats.public_repos.max(1) => {
                lines.push(format!(
                    "{} dominates your profile. Comfort zone detected.",
                    first.language
                ));
            }
            _ => {}
        }

        let years = stats.account_age_days / 365;
        if years >= 5 && stats.total_stars < 10 {
            lines.push(format!(
                "{} years on GitHub and this is the highlight reel?",
                years
            ));
        } else if years == 0 {
            lines.push("Account younger than a sourdough starter. Early days.".to_string());
        }

        if stats.social_handle.is_none() {
            tips.push("Link a social handle so people can find you after they find your code.".to_string());
        }
        if tips.is_empty() {
            tips.push("Keep shipping; consistency beats bursts.".to_string());
        }

        RoastResult {
            roast: lines.join(" "),
            tips,
        }
    }

    fn roast_leetcode(stats: &LeetCodeProfileStats) -> RoastResult {
        let mut lines = Vec::new();
        let mut tips = Vec::new();

        if stats.total_solved == 0 {
            lines.push(format!(
                "{} has solved exactly zero problems. The account is a bookmark.",
                stats.username
            ));
            tips.push("Start with the Easy tier; one problem a day adds up.".to_string());
        } else if stats.total_solved < 50 {
            lines.push(format!(
                "{} problems solved. Two-sum is not a personality.",
                stats.total_solved
            ));
            tips.push("Work through a curated list to cover the common patterns.".to_string());
        } else {
            lines.push(format!(
                "{} problems solved. Impressive grind, questionable life choices.",
                stats.total_solved
            ));
        }

        if stats.hard_solved == 0 && stats.total_solved > 0 {
            lines.push("Zero Hard problems. Allergic to difficulty?".to_string());
            tips.push("Attempt one Hard problem a week, even if you read the editorial afterwards.".to_string());
        } else if stats.easy_solved > 2 * (stats.medium_solved + stats.hard_solved) {
            lines.push(format!(
                "{} Easy versus {} Medium. Farming the easy ones, I see.",
                stats.easy_solved, stats.medium_solved
            ));
            tips.push("Shift practice toward Medium problems; that's where interviews live.".to_string());
        }

        match stats.acceptance_rate {
            None => {
                lines.push("No submissions at all, so no acceptance rate. Can't fail if you never try.".to_string());
            }
            Some(rate) if rate < 50.0 => {
                lines.push(format!(
                    "{:.1}% acceptance rate. The judge has seen things.",
                    rate
                ));
                tips.push("Test edge cases locally before submitting.".to_string());
            }
            Some(rate) => {
                lines.push(format!(
                    "{:.1}% acceptance. Either careful or copying. We'll assume careful.",
                    rate
                ));
            }
        }

        match stats.ranking {
            Some(rank) if rank > 1_000_000 => {
                lines.push(format!("Ranked #{}. Somewhere, a leaderboard needs a scroll bar just for you.", rank));
            }
            Some(rank) if rank <= 10_000 => {
                lines.push(format!("Ranked #{}. Okay, that one's actually good.", rank));
            }
            _ => {}
        }

        if tips.is_empty() {
            tips.push("Try weekly contests to practice under time pressure.".to_string());
        }

        RoastResult {
            roast: lines.join(" "),
            tips,
        }
    }
}

#[async_trait::async_trait]
impl RoastGenerator for TemplateRoaster {
    async fn roast(&self, stats: &ProfileStats) -> ToolResult<RoastResult> {
        Ok(match stats {
            ProfileStats::GitHub(stats) => Self::roast_github(stats),
            ProfileStats::LeetCode(stats) => Self::roast_leetcode(stats),
        })
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

const SYSTEM_PROMPT: &str = "You are a witty but never cruel comedian who roasts developers based on \
their public coding statistics. Reply with a JSON object with exactly two keys: \"roast\" (a short \
paragraph) and \"tips\" (an array of 2 to 4 concrete improvement tips).";

/// Roaster backed by an OpenAI-compatible `/chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct ChatRoaster {
    http: HttpClient,
    url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatRoaster {
    pub fn new(http: HttpClient, config: &RoastConfig, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn parse_completion(body: &Value) -> ToolResult<RoastResult> {
        let completion = ChatCompletion::deserialize(body)
            .map_err(|e| ToolError::Roast(format!("unexpected completion shape: {}", e)))?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ToolError::Roast("completion has no content".to_string()))?;

        let result: RoastResult = serde_json::from_str(content.trim())
            .map_err(|e| ToolError::Roast(format!("completion is not a roast object: {}", e)))?;
        if result.roast.trim().is_empty() {
            return Err(ToolError::Roast("completion returned an empty roast".to_string()));
        }
        Ok(result)
    }
}

#[async_trait::async_trait]
impl RoastGenerator for ChatRoaster {
    async fn roast(&self, stats: &ProfileStats) -> ToolResult<RoastResult> {
        let stats_json = serde_json::to_string(stats)
            .map_err(|e| ToolError::Roast(format!("could not encode stats: {}", e)))?;

        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.api_key));

        let payload = json!({
            "model": self.model,
            "temperature": 0.9,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": format!("Roast this {} profile: {}", stats.platform(), stats_json)}
            ]
        });

        let body = self
            .http
            .fetch(&self.url, HttpMethod::Post, &headers, Some(&payload))
            .await
            .map_err(|e| ToolError::Roast(format!("chat completion request failed: {}", e)))?;

        Self::parse_completion(&body)
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}
