//! Webhook API handler
//!
//! The single entry point of the trigger: authenticate the delivery,
//! classify it, resolve tag provenance, and drive the deploy pipeline.
//! The response is held open until the run terminates; there is no
//! background execution.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use capstan_core::classify::{Decision, classify};
use capstan_core::event::{WebhookEvent, WebhookPayload};
use capstan_core::signature;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /webhook
/// Receives a GitHub delivery and, for eligible tag creations, runs the
/// deploy pipeline before responding.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let presented = headers
        .get("x-hub-signature-256")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    // Verified over the exact raw bytes, before any parsing.
    if !signature::verify(&body, presented, &state.config.webhook_secret) {
        warn!("Rejected delivery with invalid signature");
        return Err(ApiError::Unauthorized("Invalid signature".to_string()));
    }

    let event_kind = headers
        .get("x-github-event")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    info!("Received GitHub event: {}", event_kind);

    let payload: WebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid payload: {e}")))?;

    let event = WebhookEvent {
        event_kind,
        ref_name: payload.ref_name,
        ref_type: payload.ref_type,
    };

    let tag = match classify(&event) {
        Decision::Proceed { tag } => tag,
        Decision::Ignored { reason } => {
            info!("Ignoring event: {}", reason);
            return Ok(Json(json!({ "message": format!("Event ignored: {reason}") })));
        }
    };

    info!("Tag created: {}", tag);

    // One run per working directory at a time.
    let _guard = state.deploy_lock.lock().await;

    state
        .workspace
        .prepare()
        .await
        .map_err(|e| ApiError::Environment(e.to_string()))?;

    let provenance = state.workspace.resolve(&tag).await;
    if !provenance.is_eligible {
        info!("Tag {} is not from a staging branch, ignoring", tag);
        return Ok(Json(
            json!({ "message": "Tag not from staging branch, ignored" }),
        ));
    }

    info!(
        "Tag {} is from a staging branch (contained in {:?}), starting pipeline",
        tag, provenance.containing_branches
    );

    let run = state.pipeline.run(&tag).await.map_err(ApiError::Pipeline)?;

    info!(
        "Pipeline run {} deployed {} as container {}",
        run.id, run.image_reference, run.container_name
    );
    Ok(Json(json!({ "message": "CI process completed successfully" })))
}
