//! HTTP routes consumed by the portfolio front end.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::aggregator::StatsAggregator;
use crate::contact::ContactForm;
use crate::error::ApiError;
use crate::mail::Mailer;
use crate::stats::StatsSummary;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: StatsAggregator,
    pub mailer: Mailer,
    pub default_account: String,
}

/// All API routes with request tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/github-stats", get(github_stats))
        .route("/api/send-email", post(send_email))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness check with the crate version.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(alias = "account")]
    pub username: Option<String>,
}

/// Always 200: upstream failure is answered with the static summary.
pub async fn github_stats(
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Json<StatsSummary> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let account = query
        .username
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(state.default_account.as_str());

    let mut rng = StdRng::from_entropy();
    match state.aggregator.summarize(account, &mut rng).await {
        Ok(summary) => Json(summary),
        Err(e) => {
            tracing::error!(account, error = %e, "Error fetching GitHub stats, serving fallback");
            Json(StatsSummary::fallback(&state.default_account))
        }
    }
}

#[derive(Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Validate a contact submission, then mail it. Invalid input never reaches the mailer.
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(form) =
        payload.map_err(|e| ApiError::bad_request("INVALID_BODY", e.body_text()))?;
    let msg = form.validate()?;
    state.mailer.send(&msg).await.map_err(ApiError::from_mail)?;

    Ok(Json(SendEmailResponse {
        success: true,
        message: "Email sent successfully",
    }))
}
