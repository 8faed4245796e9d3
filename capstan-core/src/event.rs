//! Webhook event model

use serde::{Deserialize, Serialize};

/// Kind of git reference a notification points at
///
/// GitHub sends the type as a plain string; anything that is neither a
/// branch nor a tag deserializes to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Branch,
    Tag,
    #[serde(other)]
    Other,
}

/// One inbound source-control notification
///
/// Built per request from the `X-Github-Event` header and the delivery
/// body, immutable once constructed, discarded after handling.
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    /// Event kind from the `X-Github-Event` header (e.g. "create", "push")
    pub event_kind: String,
    /// Name of the created reference
    pub ref_name: String,
    /// Kind of the created reference
    pub ref_type: RefType,
}

/// Serde view of the webhook request body
///
/// GitHub sends many more fields; only the ones the trigger acts on are
/// modeled. The repository object is accepted but not interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub ref_type: RefType,
    #[serde(default)]
    pub repository: Option<serde_json::Value>,
}
