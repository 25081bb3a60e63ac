use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported upstream platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    LeetCode,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::GitHub => f.write_str("GitHub"),
            Platform::LeetCode => f.write_str("LeetCode"),
        }
    }
}

/// Number of owned repositories declaring a language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageTally {
    pub language: String,
    pub repos: u64,
}

/// Public statistics for one GitHub account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubProfileStats {
    pub username: String,
    pub name: Option<String>,
    pub public_repos: u64,
    /// Sum of stars across the fetched repo list
    pub total_stars: u64,
    pub followers: u64,
    pub following: u64,
    /// Most-used first
    pub primary_languages: Vec<LanguageTally>,
    pub created_at: DateTime<Utc>,
    pub account_age_days: i64,
    pub social_handle: Option<String>,
    /// Most-starred repositories, at most five
    pub top_repos: Vec<String>,
}

/// Public statistics for one LeetCode account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeProfileStats {
    pub username: String,
    pub easy_solved: u64,
    pub medium_solved: u64,
    pub hard_solved: u64,
    pub total_solved: u64,
    pub total_submissions: u64,
    pub accepted_submissions: u64,
    /// Percentage in `[0, 100]`, `None` when there are no submissions
    pub acceptance_rate: Option<f64>,
    pub ranking: Option<u64>,
}

/// Stats for either platform, as handed to a roast generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", content = "stats", rename_all = "lowercase")]
pub enum ProfileStats {
    GitHub(GitHubProfileStats),
    LeetCode(LeetCodeProfileStats),
}

impl ProfileStats {
    pub fn platform(&self) -> Platform {
        match self {
            ProfileStats::GitHub(_) => Platform::GitHub,
            ProfileStats::LeetCode(_) => Platform::LeetCode,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            ProfileStats::GitHub(stats) => &stats.username,
            ProfileStats::LeetCode(stats) => &stats.username,
        }
    }
}

/// Generated commentary plus improvement tips
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoastResult {
    pub roast: String,
    pub tips: Vec<String>,
}

/// Final payload of a profile tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    #[serde(flatten)]
    pub stats: ProfileStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roast: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

impl ProfileReport {
    pub fn new(stats: ProfileStats, roast: Option<RoastResult>) -> Self {
        match roast {
            Some(RoastResult { roast, tips }) => Self {
                stats,
                roast: Some(roast),
                tips,
            },
            None => Self {
                stats,
                roast: None,
                tips: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leetcode_stats() -> LeetCodeProfileStats {
        LeetCodeProfileStats {
            username: "alice".to_string(),
            easy_solved: 1,
            medium_solved: 2,
            hard_solved: 3,
            total_solved: 6,
            total_submissions: 0,
            accepted_submissions: 0,
            acceptance_rate: None,
            ranking: None,
        }
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = ProfileReport::new(
            ProfileStats::LeetCode(leetcode_stats()),
            Some(RoastResult {
                roast: "ouch".to_string(),
                tips: vec!["practice".to_string()],
            }),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["platform"], "leetcode");
        assert_eq!(value["stats"]["total_solved"], 6);
        assert!(value["stats"]["acceptance_rate"].is_null());
        assert_eq!(value["roast"], "ouch");
        assert_eq!(value["tips"][0], "practice");
    }

    #[test]
    fn test_report_without_roast_omits_field() {
        let report = ProfileReport::new(ProfileStats::LeetCode(leetcode_stats()), None);
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("roast").is_none());
        assert_eq!(value["tips"], serde_json::json!([]));
    }

    #[test]
    fn test_profile_stats_accessors() {
        let stats = ProfileStats::LeetCode(leetcode_stats());
        assert_eq!(stats.platform(), Platform::LeetCode);
        assert_eq!(stats.username(), "alice");
        assert_eq!(Platform::GitHub.to_string(), "GitHub");
    }
}
