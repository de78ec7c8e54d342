use anyhow::{Context, Result, anyhow};
use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::calendar::ContributionDay;
use crate::config::StatsConfig;

const USER_AGENT_VALUE: &str = "Portfolio-Website/1.0";
const REST_ACCEPT: &str = "application/vnd.github.v3+json";
const CACHE_CAPACITY: u64 = 256;

const CONTRIBUTIONS_QUERY: &str = r#"
query($username: String!) {
  user(login: $username) {
    contributionsCollection {
      totalCommitContributions
      totalPullRequestContributions
      totalIssueContributions
      totalRepositoryContributions
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}
"#;

/// Public profile fields used by the summary.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    #[serde(default)]
    pub total_commit_contributions: u64,
    #[serde(default)]
    pub total_pull_request_contributions: u64,
    #[serde(default)]
    pub total_issue_contributions: u64,
    #[serde(default)]
    pub total_repository_contributions: u64,
    pub contribution_calendar: Option<ContributionCalendar>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    #[serde(default)]
    pub total_contributions: u64,
    #[serde(default)]
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    #[serde(default)]
    pub contribution_days: Vec<ContributionDay>,
}

impl ContributionCalendar {
    /// All days of the calendar in chronological order.
    pub fn days(&self) -> Vec<ContributionDay> {
        self.weeks
            .iter()
            .flat_map(|w| w.contribution_days.iter().cloned())
            .collect()
    }
}

/// Sums of the per-repository counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepoTotals {
    pub stars: u64,
    pub forks: u64,
}

impl RepoTotals {
    /// Sum stars and forks; missing counts add nothing.
    pub fn from_repos(repos: &[Repository]) -> Self {
        repos.iter().fold(Self::default(), |acc, r| Self {
            stars: acc.stars.saturating_add(r.stargazers_count.unwrap_or(0)),
            forks: acc.forks.saturating_add(r.forks_count.unwrap_or(0)),
        })
    }
}

#[derive(Clone)]
pub struct GithubClient {
    token: Option<Arc<String>>,
    http: Arc<Client>,
    api_url: Arc<String>,
    graphql_url: Arc<String>,
    cache: Cache<String, Value>,
}

impl GithubClient {
    /// Create a GitHub client for REST and GraphQL calls.
    pub fn new(config: &StatsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build GitHub HTTP client")?;

        Ok(Self {
            token: config.token.clone().map(Arc::new),
            http: Arc::new(http),
            api_url: Arc::new(config.api_url.clone()),
            graphql_url: Arc::new(config.graphql_url.clone()),
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.cache_ttl)
                .build(),
        })
    }

    /// Whether an access token is configured; GraphQL needs one.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn rest_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid GitHub API URL {}", self.api_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("GitHub API URL {} cannot take a path", self.api_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_rest_headers(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req
            .header(ACCEPT, REST_ACCEPT)
            .header(USER_AGENT, USER_AGENT_VALUE);
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("token {token}")),
            None => req,
        }
    }

    /// GET a REST resource and decode it. Only payloads that decode are cached.
    async fn rest<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let key = url.to_string();
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(url = %key, "GitHub REST cache hit");
            return serde_json::from_value(hit)
                .with_context(|| format!("Failed to deserialize cached {key}"));
        }

        let resp = self
            .with_rest_headers(self.http.get(url))
            .send()
            .await
            .with_context(|| format!("Network error requesting {key}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GitHub API returned HTTP {} for {key}", status.as_u16()));
        }

        let json: Value = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON from {key}"))?;
        let parsed: T = serde_json::from_value(json.clone())
            .with_context(|| format!("Failed to deserialize response from {key}"))?;

        self.cache.insert(key, json).await;
        Ok(parsed)
    }

    /// POST a GraphQL query with variables and `errors` checking.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow!("GraphQL requires an access token"))?;

        let resp = self
            .http
            .post(self.graphql_url.as_str())
            .bearer_auth(&**token)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| anyhow!("Network error sending GraphQL request: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GitHub GraphQL returned HTTP {}", status.as_u16()));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse JSON from GitHub GraphQL: {e}"))?;

        // GraphQL reports query failures in-band with HTTP 200
        if let Some(errors) = json.get("errors").filter(|e| !is_empty_errors(e)) {
            return Err(anyhow!("GraphQL reported errors: {errors:#}"));
        }

        Ok(json)
    }

    /// Fetch the public profile of `account`.
    pub async fn profile(&self, account: &str) -> Result<Profile> {
        self.rest(self.rest_url(&["users", account])?)
            .await
            .context("Failed to fetch user profile")
    }

    /// First page (up to 100) of repositories of every type.
    pub async fn repositories(&self, account: &str) -> Result<Vec<Repository>> {
        let mut url = self.rest_url(&["users", account, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", "100")
            .append_pair("type", "all");

        self.rest(url)
            .await
            .context("Failed to fetch repository list")
    }

    /// Contribution totals and calendar for the trailing year.
    ///
    /// The response is cached only once it carries a contributions collection.
    pub async fn contributions(&self, account: &str) -> Result<ContributionsCollection> {
        let key = format!("graphql:contributions:{account}");
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(key = %key, "GitHub GraphQL cache hit");
            return collection_from(hit, account);
        }

        let json = self
            .graphql(
                CONTRIBUTIONS_QUERY,
                serde_json::json!({ "username": account }),
            )
            .await?;
        let collection = collection_from(json.clone(), account)?;

        self.cache.insert(key, json).await;
        Ok(collection)
    }
}

/// Extract `data.user.contributionsCollection` from a GraphQL response.
fn collection_from(json: Value, account: &str) -> Result<ContributionsCollection> {
    #[derive(Deserialize)]
    struct ContribResponse {
        data: Option<ContribData>,
    }
    #[derive(Deserialize)]
    struct ContribData {
        user: Option<ContribUser>,
    }
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ContribUser {
        contributions_collection: Option<ContributionsCollection>,
    }

    let parsed: ContribResponse = serde_json::from_value(json)
        .context("Failed to deserialize contributionsCollection response")?;

    parsed
        .data
        .and_then(|d| d.user)
        .and_then(|u| u.contributions_collection)
        .ok_or_else(|| anyhow!("Missing contributionsCollection for {account}"))
}

fn is_empty_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
