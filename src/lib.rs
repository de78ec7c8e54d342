pub mod aggregator;
pub mod api;
pub mod calendar;
pub mod config;
pub mod contact;
pub mod error;
pub mod fallback;
pub mod github;
pub mod mail;
pub mod stats;

use anyhow::Result;

use aggregator::StatsAggregator;
use api::AppState;
use config::AppConfig;
use github::GithubClient;
use mail::Mailer;

/// Build the shared handler state from configuration.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let client = GithubClient::new(&config.stats)?;
    Ok(AppState {
        aggregator: StatsAggregator::new(client, config.stats.enhanced_timeout),
        mailer: Mailer::new(config.mail.clone())?,
        default_account: config.stats.default_account.clone(),
    })
}
