//! Pipeline run types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One discrete, ordered step of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Refresh the remote, hard-reset the tree, check out the tag
    Sync,
    /// Build the container image for the tag
    Build,
    /// Authenticate to the registry
    Auth,
    /// Push the built image
    Publish,
    /// Stop and remove a pre-existing container of the same name
    Recycle,
    /// Start the new container from the published image
    Deploy,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sync => "sync",
            Stage::Build => "build",
            Stage::Auth => "auth",
            Stage::Publish => "publish",
            Stage::Recycle => "recycle",
            Stage::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end-to-end deploy triggered by a single eligible tag event
///
/// Owned exclusively by the pipeline driver for the duration of the run
/// and dropped when the run terminates.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub id: Uuid,
    pub tag: String,
    pub image_reference: String,
    pub container_name: String,
    /// Stage the run is currently in (or failed in)
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
}

impl PipelineRun {
    pub fn new(tag: &str, image_reference: &str, container_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            tag: tag.to_string(),
            image_reference: image_reference.to_string(),
            container_name: container_name.to_string(),
            stage: Stage::Sync,
            started_at: Utc::now(),
        }
    }
}

/// Replaces every character outside `[A-Za-z0-9]` with a dash.
///
/// Total over arbitrary tag strings and idempotent: sanitizing twice
/// yields the same text as sanitizing once.
pub fn sanitize_for_container_name(tag: &str) -> String {
    tag.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Derives a valid container identifier for a tag.
pub fn container_name_for(prefix: &str, tag: &str) -> String {
    format!("{prefix}-{}", sanitize_for_container_name(tag))
}

/// Full image reference for a tag in the configured repository.
pub fn image_reference(repo: &str, tag: &str) -> String {
    format!("{repo}:{tag}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_non_alphanumerics() {
        assert_eq!(sanitize_for_container_name("v1.2.3"), "v1-2-3");
        assert_eq!(sanitize_for_container_name("release/2024_05"), "release-2024-05");
        assert_eq!(sanitize_for_container_name("beta!"), "beta-");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for tag in ["v1.2.3", "a b c", "---", "", "ünïcode"] {
            let once = sanitize_for_container_name(tag);
            assert_eq!(sanitize_for_container_name(&once), once);
        }
    }

    #[test]
    fn test_container_name_for_tag() {
        assert_eq!(
            container_name_for("nextjs-app", "v1.2.3"),
            "nextjs-app-v1-2-3"
        );
    }

    #[test]
    fn test_image_reference() {
        assert_eq!(
            image_reference("your-repo/nextjs-app", "v1.2.3"),
            "your-repo/nextjs-app:v1.2.3"
        );
    }

    #[test]
    fn test_new_run_starts_at_sync() {
        let run = PipelineRun::new("v1.0.0", "repo:v1.0.0", "app-v1-0-0");
        assert_eq!(run.stage, Stage::Sync);
        assert_eq!(run.tag, "v1.0.0");
    }
}
