//! Runtime configuration.
//!
//! Every option can be set by flag or environment variable. A `.env` file in
//! the working directory is loaded before parsing.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_ACCOUNT: &str = "Arun-S-1505";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_CONTACT_SENDER: &str = "Portfolio Contact <onboarding@resend.dev>";
pub const DEFAULT_CONTACT_RECIPIENT: &str = "arunsivagnanamurthy@gmail.com";

#[derive(Parser, Debug, Clone)]
#[command(name = "folio-stats", version, about = "Portfolio GitHub stats and contact API")]
pub struct Cli {
    #[arg(long, env = "FOLIO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "FOLIO_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Account summarized when a request names none
    #[arg(long, env = "FOLIO_DEFAULT_ACCOUNT", default_value = DEFAULT_ACCOUNT)]
    pub default_account: String,

    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GITHUB_GRAPHQL_URL)]
    pub github_graphql_url: String,

    #[arg(long, env = "FOLIO_HTTP_TIMEOUT_SECS", default_value_t = 15)]
    pub http_timeout_secs: u64,

    /// Upper bound on the optional contribution query
    #[arg(long, env = "FOLIO_ENHANCED_TIMEOUT_SECS", default_value_t = 10)]
    pub enhanced_timeout_secs: u64,

    #[arg(long, env = "FOLIO_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    #[arg(long, env = "RESEND_API_URL", default_value = DEFAULT_RESEND_API_URL)]
    pub resend_api_url: String,

    #[arg(long, env = "CONTACT_RECIPIENT", default_value = DEFAULT_CONTACT_RECIPIENT)]
    pub contact_recipient: String,

    #[arg(long, env = "CONTACT_SENDER", default_value = DEFAULT_CONTACT_SENDER)]
    pub contact_sender: String,
}

/// Settings for the GitHub client and aggregator.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub default_account: String,
    pub token: Option<String>,
    pub api_url: String,
    pub graphql_url: String,
    pub http_timeout: Duration,
    pub enhanced_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_account: DEFAULT_ACCOUNT.to_string(),
            token: None,
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            graphql_url: DEFAULT_GITHUB_GRAPHQL_URL.to_string(),
            http_timeout: Duration::from_secs(15),
            enhanced_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// Settings for the contact mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub sender: String,
    pub recipient: String,
    pub http_timeout: Duration,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_RESEND_API_URL.to_string(),
            sender: DEFAULT_CONTACT_SENDER.to_string(),
            recipient: DEFAULT_CONTACT_RECIPIENT.to_string(),
            http_timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub stats: StatsConfig,
    pub mail: MailConfig,
}

impl Cli {
    /// Load `.env` if present, then parse flags and environment.
    pub fn load() -> Self {
        // Logging is not up yet
        match dotenvy::dotenv() {
            Err(e) if !e.not_found() => eprintln!("Warning: failed to load .env file: {e}"),
            _ => {}
        }
        Self::parse()
    }

    pub fn into_config(self) -> Result<AppConfig> {
        let addr = format!("{}:{}", self.host, self.port)
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?;
        let http_timeout = Duration::from_secs(self.http_timeout_secs);

        Ok(AppConfig {
            addr,
            stats: StatsConfig {
                default_account: self.default_account,
                token: non_blank(self.github_token),
                api_url: self.github_api_url.trim_end_matches('/').to_string(),
                graphql_url: self.github_graphql_url,
                http_timeout,
                enhanced_timeout: Duration::from_secs(self.enhanced_timeout_secs),
                cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            },
            mail: MailConfig {
                api_key: non_blank(self.resend_api_key),
                api_url: self.resend_api_url,
                sender: self.contact_sender,
                recipient: self.contact_recipient,
                http_timeout,
            },
        })
    }
}

/// An empty token in the environment means no token.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
