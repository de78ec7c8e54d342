use anyhow::{Context, Result};
use folio_stats::config::Cli;
use tokio::net::TcpListener;

const ENV_LOG: &str = "FOLIO_LOG";

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info,folio_stats=info,tower_http=info".to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}

async fn run() -> Result<()> {
    let config = Cli::load().into_config()?;
    init_logging();

    if config.stats.token.is_none() {
        tracing::info!("GITHUB_ACCESS_TOKEN not set, contribution data will be synthesized");
    }
    if config.mail.api_key.is_none() {
        tracing::info!("RESEND_API_KEY not set, contact submissions will only be logged");
    }

    let state = folio_stats::build_state(&config)?;
    let app = folio_stats::api::router(state);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("\nError: {e:#}\n");
        std::process::exit(1);
    }
}
