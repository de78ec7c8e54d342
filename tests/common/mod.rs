//! Mock GitHub and mail provider servers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use folio_stats::config::{AppConfig, MailConfig, StatsConfig};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ACCOUNT: &str = "octocat";
pub const TOKEN: &str = "ghp_test";
pub const MAIL_KEY: &str = "re_test";

#[derive(Clone, Debug)]
pub enum GraphqlMode {
    /// Calendar with these counts, newest day 2024-06-16 (a Sunday)
    Calendar {
        commits: u64,
        pull_requests: u64,
        counts: Vec<u64>,
    },
    Status(u16),
    Errors,
    MissingCollection,
    Slow(Duration),
}

#[derive(Default)]
pub struct Calls {
    pub profile: AtomicUsize,
    pub repos: AtomicUsize,
    pub graphql: AtomicUsize,
    pub mail: AtomicUsize,
    pub rest_auth: Mutex<Vec<Option<String>>>,
    pub graphql_auth: Mutex<Vec<Option<String>>>,
    pub mail_auth: Mutex<Vec<Option<String>>>,
    pub mail_bodies: Mutex<Vec<Value>>,
}

impl Calls {
    pub fn profile(&self) -> usize {
        self.profile.load(Ordering::SeqCst)
    }
    pub fn repos(&self) -> usize {
        self.repos.load(Ordering::SeqCst)
    }
    pub fn graphql(&self) -> usize {
        self.graphql.load(Ordering::SeqCst)
    }
    pub fn mail(&self) -> usize {
        self.mail.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
pub struct MockUpstream {
    pub profile_status: u16,
    /// Replaces the default profile JSON when set
    pub profile_body: Option<Value>,
    pub repos_status: u16,
    pub graphql: GraphqlMode,
    pub mail_status: u16,
    pub calls: Arc<Calls>,
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self {
            profile_status: 200,
            profile_body: None,
            repos_status: 200,
            graphql: GraphqlMode::Calendar {
                commits: 340,
                pull_requests: 60,
                counts: vec![1, 1, 0, 1, 1, 1, 0, 1, 1, 1],
            },
            mail_status: 200,
            calls: Arc::new(Calls::default()),
        }
    }
}

fn auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn profile(
    State(mock): State<MockUpstream>,
    Path(account): Path<String>,
    headers: HeaderMap,
) -> Response {
    mock.calls.profile.fetch_add(1, Ordering::SeqCst);
    mock.calls.rest_auth.lock().unwrap().push(auth_header(&headers));
    if account != ACCOUNT {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response();
    }
    let status = StatusCode::from_u16(mock.profile_status).unwrap();
    if !status.is_success() {
        return status.into_response();
    }
    let body = mock
        .profile_body
        .unwrap_or_else(|| json!({ "login": ACCOUNT, "public_repos": 8, "followers": 42 }));
    Json(body).into_response()
}

async fn repos(
    State(mock): State<MockUpstream>,
    Path(account): Path<String>,
    headers: HeaderMap,
) -> Response {
    mock.calls.repos.fetch_add(1, Ordering::SeqCst);
    mock.calls.rest_auth.lock().unwrap().push(auth_header(&headers));
    if account != ACCOUNT {
        return StatusCode::NOT_FOUND.into_response();
    }
    let status = StatusCode::from_u16(mock.repos_status).unwrap();
    if !status.is_success() {
        return status.into_response();
    }
    Json(json!([
        { "name": "a", "stargazers_count": 10, "forks_count": 2 },
        { "name": "b", "stargazers_count": 5, "forks_count": 1 },
        { "name": "c" }
    ]))
    .into_response()
}

fn calendar_days(counts: &[u64]) -> Vec<Value> {
    let last = chrono::NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
    let n = counts.len() as i64;
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let date = last - chrono::Duration::days(n - 1 - i as i64);
            json!({ "contributionCount": c, "date": date.to_string() })
        })
        .collect()
}

async fn graphql(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.calls.graphql.fetch_add(1, Ordering::SeqCst);
    mock.calls.graphql_auth.lock().unwrap().push(auth_header(&headers));
    assert_eq!(body["variables"]["username"], ACCOUNT);

    match mock.graphql {
        GraphqlMode::Calendar {
            commits,
            pull_requests,
            counts,
        } => {
            // Split into weeks of seven to mirror the real calendar layout
            let weeks: Vec<Value> = calendar_days(&counts)
                .chunks(7)
                .map(|c| json!({ "contributionDays": c }))
                .collect();
            Json(json!({
                "data": { "user": { "contributionsCollection": {
                    "totalCommitContributions": commits,
                    "totalPullRequestContributions": pull_requests,
                    "totalIssueContributions": 4,
                    "totalRepositoryContributions": 1,
                    "contributionCalendar": {
                        "totalContributions": commits + pull_requests,
                        "weeks": weeks
                    }
                }}}
            }))
            .into_response()
        }
        GraphqlMode::Status(code) => StatusCode::from_u16(code).unwrap().into_response(),
        GraphqlMode::Errors => Json(json!({
            "data": null,
            "errors": [{ "message": "Could not resolve to a User" }]
        }))
        .into_response(),
        GraphqlMode::MissingCollection => {
            Json(json!({ "data": { "user": null } })).into_response()
        }
        GraphqlMode::Slow(delay) => {
            tokio::time::sleep(delay).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

async fn send_mail(
    State(mock): State<MockUpstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.calls.mail.fetch_add(1, Ordering::SeqCst);
    mock.calls.mail_auth.lock().unwrap().push(auth_header(&headers));
    mock.calls.mail_bodies.lock().unwrap().push(body);
    let status = StatusCode::from_u16(mock.mail_status).unwrap();
    if !status.is_success() {
        return (status, Json(json!({ "message": "provider down" }))).into_response();
    }
    Json(json!({ "id": "email_123" })).into_response()
}

/// Serve the mock on an ephemeral local port.
pub async fn spawn(mock: MockUpstream) -> String {
    let app = Router::new()
        .route("/users/{account}", get(profile))
        .route("/users/{account}/repos", get(repos))
        .route("/graphql", post(graphql))
        .route("/emails", post(send_mail))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

pub fn config(base: &str, token: Option<&str>, mail_key: Option<&str>) -> AppConfig {
    AppConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        stats: StatsConfig {
            default_account: ACCOUNT.to_string(),
            token: token.map(str::to_string),
            api_url: base.to_string(),
            graphql_url: format!("{base}/graphql"),
            http_timeout: Duration::from_secs(5),
            enhanced_timeout: Duration::from_millis(500),
            ..StatsConfig::default()
        },
        mail: MailConfig {
            api_key: mail_key.map(str::to_string),
            api_url: format!("{base}/emails"),
            sender: "Portfolio Contact <onboarding@resend.dev>".to_string(),
            recipient: "owner@example.com".to_string(),
            http_timeout: Duration::from_secs(5),
        },
    }
}

pub fn app(config: &AppConfig) -> Router {
    folio_stats::api::router(folio_stats::build_state(config).unwrap())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).expect("json body"))
}
