//! Health check API handler

use axum::Json;
use serde_json::{Value, json};

/// GET /health
/// Liveness probe, no auth.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
