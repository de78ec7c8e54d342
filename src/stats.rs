use serde::{Deserialize, Serialize};

/// Share of contributions reported as pull requests, in tenths.
const PULL_REQUEST_TENTHS: u64 = 3;
/// Share of contributions reported as code reviews, in tenths.
const REVIEW_TENTHS: u64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(rename = "username")]
    pub account: String,
    #[serde(rename = "primaryStats")]
    pub primary: PrimaryStats,
    #[serde(rename = "additionalStats")]
    pub secondary: SecondaryStats,
    #[serde(rename = "contributionData")]
    pub activity: ActivityStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryStats {
    pub repositories: u64,
    pub stars: u64,
    pub commits: u64,
    pub followers: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryStats {
    pub pull_requests: u64,
    pub forks: u64,
    pub code_reviews: u64,
    pub contributions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_contributions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_activity: Vec<DayActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub day: String,
    pub commits: u64,
}

impl DayActivity {
    pub fn new(day: impl Into<String>, commits: u64) -> Self {
        Self {
            day: day.into(),
            commits,
        }
    }
}

/// floor(0.3 × contributions), computed in integers so multiples of ten
/// never round down.
pub fn estimated_pull_requests(contributions: u64) -> u64 {
    contributions.saturating_mul(PULL_REQUEST_TENTHS) / 10
}

/// floor(0.2 × contributions)
pub fn estimated_reviews(contributions: u64) -> u64 {
    contributions.saturating_mul(REVIEW_TENTHS) / 10
}

impl StatsSummary {
    /// Static summary served when GitHub cannot be reached at all.
    pub fn fallback(account: &str) -> Self {
        let week = [
            ("Mon", 8),
            ("Tue", 12),
            ("Wed", 15),
            ("Thu", 10),
            ("Fri", 18),
            ("Sat", 5),
            ("Sun", 7),
        ];

        Self {
            account: account.to_string(),
            primary: PrimaryStats {
                repositories: 25,
                stars: 50,
                commits: 500,
                followers: 20,
            },
            secondary: SecondaryStats {
                pull_requests: 120,
                forks: 15,
                code_reviews: 80,
                contributions: 450,
            },
            activity: ActivityStats {
                total_contributions: 450,
                current_streak: 12,
                longest_streak: 45,
                weekly_activity: week
                    .iter()
                    .map(|(day, commits)| DayActivity::new(*day, *commits))
                    .collect(),
            },
        }
    }
}
