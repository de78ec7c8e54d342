//! Builds a [`StatsSummary`] from the GitHub REST and GraphQL APIs.
//!
//! Profile and repository data are mandatory. Contribution data is fetched
//! only with an access token and may fail without failing the summary; any
//! field still unresolved afterwards gets a placeholder from [`fallback`].

use std::time::Duration;

use rand::Rng;

use crate::calendar::{self, WEEK_DAYS};
use crate::error::StatsError;
use crate::fallback;
use crate::github::{ContributionsCollection, GithubClient, RepoTotals};
use crate::stats::{
    ActivityStats, DayActivity, PrimaryStats, SecondaryStats, StatsSummary,
    estimated_pull_requests, estimated_reviews,
};

/// Contribution-derived figures. Zero or empty means "not known".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Enhanced {
    pub contributions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub weekly_activity: Vec<DayActivity>,
}

impl Enhanced {
    /// Contributions are commits plus pull requests; streaks and the week come from the calendar.
    pub fn from_collection(collection: &ContributionsCollection) -> Self {
        let mut out = Self {
            contributions: collection
                .total_commit_contributions
                .saturating_add(collection.total_pull_request_contributions),
            ..Self::default()
        };

        if let Some(calendar) = &collection.contribution_calendar {
            let days = calendar.days();
            out.current_streak = calendar::current_streak(&days);
            out.longest_streak = calendar::longest_streak(&days);
            out.weekly_activity = calendar::weekly_activity(&days);
        }

        out
    }
}

#[derive(Clone)]
pub struct StatsAggregator {
    client: GithubClient,
    enhanced_timeout: Duration,
}

impl StatsAggregator {
    /// `enhanced_timeout` bounds the optional contribution query.
    pub fn new(client: GithubClient, enhanced_timeout: Duration) -> Self {
        Self {
            client,
            enhanced_timeout,
        }
    }

    /// Summarize `account`. Only `UpstreamUnavailable` is ever returned.
    pub async fn summarize<R: Rng + ?Sized>(
        &self,
        account: &str,
        rng: &mut R,
    ) -> Result<StatsSummary, StatsError> {
        let profile = self
            .client
            .profile(account)
            .await
            .map_err(|e| StatsError::UpstreamUnavailable(format!("{e:#}")))?;

        let repos = self
            .client
            .repositories(account)
            .await
            .map_err(|e| StatsError::UpstreamUnavailable(format!("{e:#}")))?;
        let totals = RepoTotals::from_repos(&repos);

        let enhanced = match self.enhanced(account).await {
            Ok(enhanced) => enhanced,
            Err(e) => {
                tracing::warn!(account, error = %e, "Failed to fetch GraphQL contribution data");
                Enhanced::default()
            }
        };

        Ok(assemble(
            account,
            profile.public_repos.unwrap_or(0),
            profile.followers.unwrap_or(0),
            totals,
            enhanced,
            rng,
        ))
    }

    /// Best-effort contribution query; absent token yields empty data.
    async fn enhanced(&self, account: &str) -> Result<Enhanced, StatsError> {
        if !self.client.has_token() {
            return Ok(Enhanced::default());
        }

        let query = self.client.contributions(account);
        let collection = tokio::time::timeout(self.enhanced_timeout, query)
            .await
            .map_err(|_| {
                StatsError::EnhancedDataUnavailable(format!(
                    "timed out after {:?}",
                    self.enhanced_timeout
                ))
            })?
            .map_err(|e| StatsError::EnhancedDataUnavailable(format!("{e:#}")))?;

        Ok(Enhanced::from_collection(&collection))
    }
}

/// Combine fetched figures, filling each unknown field independently.
pub fn assemble<R: Rng + ?Sized>(
    account: &str,
    repositories: u64,
    followers: u64,
    totals: RepoTotals,
    enhanced: Enhanced,
    rng: &mut R,
) -> StatsSummary {
    let contributions = match enhanced.contributions {
        0 => fallback::contributions(rng),
        n => n,
    };

    // A short calendar cannot fill a week
    let weekly_activity = if enhanced.weekly_activity.len() == WEEK_DAYS {
        enhanced.weekly_activity
    } else {
        fallback::weekly_activity(rng)
    };

    let current_streak = match enhanced.current_streak {
        0 => fallback::current_streak(rng),
        n => n,
    };
    let longest_streak = match enhanced.longest_streak {
        0 => fallback::longest_streak(rng),
        n => n,
    };

    StatsSummary {
        account: account.to_string(),
        primary: PrimaryStats {
            repositories,
            stars: totals.stars,
            commits: contributions,
            followers,
        },
        secondary: SecondaryStats {
            pull_requests: estimated_pull_requests(contributions),
            forks: totals.forks,
            code_reviews: estimated_reviews(contributions),
            contributions,
        },
        activity: ActivityStats {
            total_contributions: contributions,
            current_streak,
            longest_streak,
            weekly_activity,
        },
    }
}
