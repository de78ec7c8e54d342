//! Contact mail delivery through the Resend HTTP API.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::MailConfig;
use crate::contact::ContactMessage;
use crate::error::MailError;

const RULE: &str = "----------------------------------------";

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    reply_to: &'a str,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ProviderReply {
    id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { id: Option<String> },
    /// No API key configured; the submission went to the log instead.
    Logged,
}

#[derive(Clone)]
pub struct Mailer {
    config: Arc<MailConfig>,
    http: Arc<Client>,
}

impl Mailer {
    /// Create a mailer with its own HTTP client.
    pub fn new(config: MailConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build mail HTTP client")?;
        Ok(Self {
            config: Arc::new(config),
            http: Arc::new(http),
        })
    }

    /// Send `msg` to the configured recipient with the sender as reply-to.
    ///
    /// Without an API key the submission is logged and `Delivery::Logged`
    /// is returned.
    pub async fn send(&self, msg: &ContactMessage) -> Result<Delivery, MailError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::info!(
                name = %msg.name,
                email = %msg.email,
                message = %msg.message,
                "Mail API key not configured, logging contact submission"
            );
            return Ok(Delivery::Logged);
        };

        let email = OutgoingEmail {
            from: &self.config.sender,
            to: [&self.config.recipient],
            subject: subject(msg),
            reply_to: &msg.email,
            text: render_text(msg, Utc::now()),
        };

        let resp = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&email)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let id = resp.json::<ProviderReply>().await.ok().and_then(|r| r.id);
        tracing::info!(id = ?id, reply_to = %msg.email, "Contact email sent");
        Ok(Delivery::Sent { id })
    }
}

/// Subject line of the notification email.
pub fn subject(msg: &ContactMessage) -> String {
    format!("New Portfolio Message from {}", msg.name)
}

/// Plain-text body of the notification email.
pub fn render_text(msg: &ContactMessage, at: DateTime<Utc>) -> String {
    format!(
        "{RULE}\nNEW CONTACT FORM SUBMISSION\n{RULE}\n\n\
         CONTACT DETAILS\n{RULE}\n\
         Name:     {name}\n\
         Email:    {email}\n\
         Date:     {date}\n\n\
         {RULE}\nMESSAGE\n{RULE}\n\n\
         {message}\n\n\
         {RULE}\n\n\
         This message was sent from your portfolio contact form.\n\
         To reply, simply respond to this email.",
        name = msg.name,
        email = msg.email,
        date = at.format("%A, %B %-d, %Y at %-I:%M %p UTC"),
        message = msg.message,
    )
}
