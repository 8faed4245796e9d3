//! API module
//!
//! HTTP surface of the webhook server: the delivery endpoint, the health
//! probe, and the mapping from pipeline outcomes to HTTP responses.

pub mod error;
pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use capstan_runner::{CommandRunner, DeployPipeline, Workspace};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub workspace: Arc<Workspace>,
    pub pipeline: Arc<DeployPipeline>,
    /// Serializes runs against the single working directory: concurrent
    /// deliveries queue here instead of interleaving their sync stages.
    pub deploy_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Builds the shared state from configuration and a command runner.
    pub fn new(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        let workspace = Arc::new(Workspace::new(
            config.project_dir.clone(),
            config.repo_url.clone(),
            runner.clone(),
        ));
        let pipeline = Arc::new(DeployPipeline::new(config.deploy_settings(), runner));

        Self {
            config: Arc::new(config),
            workspace,
            pipeline,
            deploy_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }
}

/// Create the main router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook::handle_webhook))
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
