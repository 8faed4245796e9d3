//! Capstan webhook server
//!
//! Receives GitHub `create` events and, for tags cut from a staging
//! branch, drives the sync → build → publish → deploy pipeline against
//! the local checkout and the docker daemon. Each delivery is handled
//! synchronously: the response is held open until the pipeline run
//! terminates.

pub mod api;
pub mod config;

use std::sync::Arc;

use anyhow::Context;
use capstan_runner::ShellRunner;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::AppState;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capstan_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting capstan webhook server");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: repo={}, project_dir={}, port={}",
        config.docker_repo,
        config.project_dir.display(),
        config.port
    );

    let runner = Arc::new(ShellRunner::new(config.command_timeout));
    let port = config.port;
    let app = api::create_router(AppState::new(config, runner));

    let addr = format!("0.0.0.0:{port}");
    info!("Listening on {}", addr);
    info!("Webhook endpoint: http://localhost:{}/webhook", port);
    info!("Health check: http://localhost:{}/health", port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
