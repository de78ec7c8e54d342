//! Error types for the stats aggregator, the mailer and the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure classes of a stats aggregation.
///
/// `UpstreamUnavailable` aborts the aggregation and makes the endpoint serve
/// the static summary. `EnhancedDataUnavailable` never leaves the aggregator.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("GitHub upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Enhanced contribution data unavailable: {0}")]
    EnhancedDataUnavailable(String),
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail provider rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Error returned to API callers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_mail(e: MailError) -> Self {
        tracing::error!(error = %e, "Email send error");
        Self::Internal {
            message: "Failed to send email".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
