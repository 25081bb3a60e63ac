use crate::error::{ToolError, ToolResult};
use crate::types::{GitHubProfileStats, LanguageTally, LeetCodeProfileStats};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Number of repository names kept in `top_repos`.
const TOP_REPOS: usize = 5;

#[derive(Debug, Deserialize)]
struct RawGitHubUser {
    login: Option<String>,
    name: Option<String>,
    #[serde(default)]
    public_repos: u64,
    #[serde(default)]
    followers: u64,
    #[serde(default)]
    following: u64,
    created_at: Option<DateTime<Utc>>,
    twitter_username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
}

/// Reshape a GitHub user document and its repository list.
///
/// `now` anchors the account age computation.
pub fn normalize_github(
    raw_user: &Value,
    raw_repos: &Value,
    now: DateTime<Utc>,
) -> ToolResult<GitHubProfileStats> {
    let user = RawGitHubUser::deserialize(raw_user)
        .map_err(|e| ToolError::malformed(format!("GitHub user document: {}", e)))?;
    let repos = Vec::<RawRepo>::deserialize(raw_repos)
        .map_err(|e| ToolError::malformed(format!("GitHub repository list: {}", e)))?;

    let username = user
        .login
        .filter(|login| !login.is_empty())
        .ok_or_else(|| ToolError::malformed("GitHub user document has no login"))?;
    let created_at = user
        .created_at
        .ok_or_else(|| ToolError::malformed("GitHub user document has no created_at"))?;

    let total_stars = checked_sum(repos.iter().map(|r| r.stargazers_count), "GitHub star")?;

    Ok(GitHubProfileStats {
        username,
        name: user.name.filter(|n| !n.is_empty()),
        public_repos: user.public_repos,
        total_stars,
        followers: user.followers,
        following: user.following,
        primary_languages: tally_languages(&repos),
        created_at,
        account_age_days: (now - created_at).num_days().max(0),
        social_handle: user.twitter_username.filter(|h| !h.is_empty()),
        top_repos: top_repos(&repos),
    })
}

/// Count repos per language, most-used first, ties in first-seen order.
fn tally_languages(repos: &[RawRepo]) -> Vec<LanguageTally> {
    let mut tallies: Vec<LanguageTally> = Vec::new();

    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        match tallies.iter_mut().find(|t| t.language == language) {
            Some(tally) => tally.repos += 1,
            None => tallies.push(LanguageTally {
                language: language.to_string(),
                repos: 1,
            }),
        }
    }

    // Stable sort keeps first-seen order among equal counts
    tallies.sort_by(|a, b| b.repos.cmp(&a.repos));
    tallies
}

fn top_repos(repos: &[RawRepo]) -> Vec<String> {
    let mut ranked: Vec<&RawRepo> = repos.iter().filter(|r| !r.name.is_empty()).collect();
    ranked.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    ranked
        .into_iter()
        .take(TOP_REPOS)
        .map(|r| r.name.clone())
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawLeetCodeResponse {
    data: Option<RawLeetCodeData>,
    #[serde(default)]
    errors: Vec<RawGraphQlError>,
}

#[derive(Debug, Deserialize)]
struct RawGraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeetCodeData {
    matched_user: Option<RawMatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatchedUser {
    username: String,
    profile: Option<RawLeetCodeProfile>,
    submit_stats: RawSubmitStats,
}

#[derive(Debug, Deserialize)]
struct RawLeetCodeProfile {
    ranking: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubmitStats {
    ac_submission_num: Vec<RawSubmissionCount>,
    #[serde(default)]
    total_submission_num: Vec<RawSubmissionCount>,
}

#[derive(Debug, Deserialize)]
struct RawSubmissionCount {
    difficulty: String,
    count: u64,
    #[serde(default)]
    submissions: u64,
}

const TIERS: [&str; 3] = ["Easy", "Medium", "Hard"];

/// Reshape a LeetCode GraphQL response body.
pub fn normalize_leetcode(raw_stats: &Value) -> ToolResult<LeetCodeProfileStats> {
    let response = RawLeetCodeResponse::deserialize(raw_stats)
        .map_err(|e| ToolError::malformed(format!("LeetCode response: {}", e)))?;

    let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();

    let data = response.data.ok_or_else(|| {
        ToolError::malformed(format!("LeetCode response has no data: {}", messages.join("; ")))
    })?;

    // LeetCode answers 200 with a null matchedUser for unknown users
    let Some(user) = data.matched_user else {
        let body = if messages.is_empty() {
            "LeetCode user not found".to_string()
        } else {
            messages.join("; ")
        };
        return Err(ToolError::Upstream { status: 404, body });
    };

    if !messages.is_empty() {
        return Err(ToolError::malformed(format!(
            "LeetCode GraphQL errors: {}",
            messages.join("; ")
        )));
    }

    let stats = &user.submit_stats;
    let [easy, medium, hard] = TIERS.map(|tier| find_tier(&stats.ac_submission_num, tier));
    let easy_solved = easy.ok_or_else(|| missing_tier("Easy"))?.count;
    let medium_solved = medium.ok_or_else(|| missing_tier("Medium"))?.count;
    let hard_solved = hard.ok_or_else(|| missing_tier("Hard"))?.count;

    let total_solved = checked_sum([easy_solved, medium_solved, hard_solved], "LeetCode solved")?;
    let total_submissions = submissions_total(&stats.total_submission_num)?;
    let accepted_submissions = submissions_total(&stats.ac_submission_num)?;

    Ok(LeetCodeProfileStats {
        username: user.username,
        easy_solved,
        medium_solved,
        hard_solved,
        total_solved,
        total_submissions,
        accepted_submissions,
        acceptance_rate: acceptance_rate(accepted_submissions, total_submissions),
        ranking: user
            .profile
            .and_then(|p| p.ranking)
            .filter(|r| *r >= 1)
            .map(|r| r as u64),
    })
}

/// Accepted share of submissions as a percentage.
///
/// Returns `None` when nothing was submitted.
pub fn acceptance_rate(accepted: u64, submitted: u64) -> Option<f64> {
    if submitted == 0 {
        return None;
    }
    let rate = accepted as f64 * 100.0 / submitted as f64;
    Some(rate.clamp(0.0, 100.0))
}

fn find_tier<'a>(counts: &'a [RawSubmissionCount], tier: &str) -> Option<&'a RawSubmissionCount> {
    counts.iter().find(|c| c.difficulty == tier)
}

fn missing_tier(tier: &str) -> ToolError {
    ToolError::malformed(format!("LeetCode response is missing the {} solved count", tier))
}

/// The `All` row when present, otherwise the sum of the tier rows.
fn submissions_total(counts: &[RawSubmissionCount]) -> ToolResult<u64> {
    match find_tier(counts, "All") {
        Some(all) => Ok(all.submissions),
        None => checked_sum(
            TIERS
                .iter()
                .filter_map(|tier| find_tier(counts, tier))
                .map(|c| c.submissions),
            "LeetCode submission",
        ),
    }
}

/// Sum upstream counts, rejecting totals that do not fit in a `u64`.
fn checked_sum(values: impl IntoIterator<Item = u64>, what: &str) -> ToolResult<u64> {
    values
        .into_iter()
        .try_fold(0u64, |acc, v| acc.checked_add(v))
        .ok_or_else(|| ToolError::malformed(format!("{} count overflows", what)))
}
