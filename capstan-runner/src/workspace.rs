//! Git workspace
//!
//! The local synchronized checkout of the deployed repository: cloned once
//! on first use, refreshed before each provenance query, and shared with
//! the deploy pipeline. At most one pipeline run may mutate it at a time;
//! the server serializes runs with a per-workspace lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use capstan_core::provenance::ProvenanceResult;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::CommandRunner;

/// Result type alias for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors preparing the working directory
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The working directory could not be created
    #[error("failed to create working directory {dir}: {source}")]
    CreateDir {
        dir: String,
        #[source]
        source: std::io::Error,
    },

    /// The initial clone failed
    #[error("failed to clone {remote}: {detail}")]
    Clone { remote: String, detail: String },
}

/// The working-directory checkout used for provenance queries and builds.
pub struct Workspace {
    dir: PathBuf,
    remote_url: String,
    runner: Arc<dyn CommandRunner>,
}

impl Workspace {
    pub fn new(dir: PathBuf, remote_url: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            dir,
            remote_url,
            runner,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the checkout exists, cloning the remote on first use.
    ///
    /// Idempotent: an existing directory is left untouched, so the clone
    /// runs at most once per working-directory lifetime.
    pub async fn prepare(&self) -> Result<()> {
        if self.dir.exists() {
            debug!("Working directory {} already prepared", self.dir.display());
            return Ok(());
        }

        info!(
            "Working directory {} missing, cloning {}",
            self.dir.display(),
            self.remote_url
        );

        std::fs::create_dir_all(&self.dir).map_err(|source| WorkspaceError::CreateDir {
            dir: self.dir.display().to_string(),
            source,
        })?;

        let clone = format!("git clone {} {}", self.remote_url, self.dir.display());
        let result = self.runner.run(&clone, None).await;
        if !result.success() {
            // A failed clone leaves an empty directory that would mask the
            // retry on the next delivery.
            let _ = std::fs::remove_dir_all(&self.dir);
            return Err(WorkspaceError::Clone {
                remote: self.remote_url.clone(),
                detail: result.failure_summary(),
            });
        }

        Ok(())
    }

    /// Determines which remote branches contain `tag` and whether that
    /// makes the tag release-eligible.
    ///
    /// Failures are absorbed: a fetch or query error yields an ineligible
    /// result instead of propagating, matching how the caller treats an
    /// ineligible tag. Each failure is still logged with the failing step.
    pub async fn resolve(&self, tag: &str) -> ProvenanceResult {
        let fetch = self
            .runner
            .run("git fetch --all --tags", Some(&self.dir))
            .await;
        if !fetch.success() {
            warn!(
                "Provenance resolution for tag {} failed at fetch: {}",
                tag,
                fetch.failure_summary()
            );
            return ProvenanceResult::ineligible();
        }

        let contains = self
            .runner
            .run(&format!("git branch -r --contains {tag}"), Some(&self.dir))
            .await;
        if !contains.success() {
            warn!(
                "Provenance resolution for tag {} failed at branch query: {}",
                tag,
                contains.failure_summary()
            );
            return ProvenanceResult::ineligible();
        }

        let branches = parse_remote_branches(&contains.stdout);
        debug!("Tag {} is contained in branches {:?}", tag, branches);
        ProvenanceResult::from_branches(branches)
    }
}

/// Parses `git branch -r --contains` output into branch names.
///
/// The remote-tracking prefix is stripped from each line; symref pointer
/// lines (`origin/HEAD -> origin/main`) are dropped.
fn parse_remote_branches(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("->"))
        .map(|line| strip_remote_prefix(line).to_string())
        .collect()
}

fn strip_remote_prefix(line: &str) -> &str {
    line.split_once('/').map(|(_, rest)| rest).unwrap_or(line)
}
