//! Deploy pipeline
//!
//! The ordered build-and-deploy sequence for one tag: sync the checkout,
//! build and publish the image, replace the running container. Stages run
//! strictly one after another with no retries; a failed stage terminates
//! the run, except the recycle stage, where the previous container may
//! legitimately not exist.

use std::path::PathBuf;
use std::sync::Arc;

use capstan_core::command::CommandResult;
use capstan_core::pipeline::{PipelineRun, Stage, container_name_for, image_reference};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::CommandRunner;

/// Errors terminating a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required stage's command failed
    #[error("stage {stage} failed: {}", .result.failure_summary())]
    Stage { stage: Stage, result: CommandResult },
}

impl PipelineError {
    /// The stage the run failed in.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Stage { stage, .. } => *stage,
        }
    }
}

/// Deployment parameters for one workspace
#[derive(Debug, Clone)]
pub struct DeploySettings {
    /// The synced source checkout; every stage command runs in it
    pub project_dir: PathBuf,
    /// Registry repository the image is tagged into
    pub docker_repo: String,
    pub docker_username: String,
    pub docker_password: String,
    /// Host port published on the deployed container
    pub host_port: u16,
    /// Container port, also exported to the app as `PORT`
    pub container_port: u16,
    /// Prefix of the derived container name
    pub container_prefix: String,
}

/// Sequential six-stage deploy driver
pub struct DeployPipeline {
    settings: DeploySettings,
    runner: Arc<dyn CommandRunner>,
}

impl DeployPipeline {
    pub fn new(settings: DeploySettings, runner: Arc<dyn CommandRunner>) -> Self {
        Self { settings, runner }
    }

    /// Runs the full pipeline for `tag`.
    ///
    /// A later stage never starts if an earlier required stage failed; the
    /// returned error carries the originating stage and the underlying
    /// command output as cause.
    pub async fn run(&self, tag: &str) -> Result<PipelineRun, PipelineError> {
        let image = image_reference(&self.settings.docker_repo, tag);
        let container = container_name_for(&self.settings.container_prefix, tag);
        let mut run = PipelineRun::new(tag, &image, &container);

        info!(
            "Starting pipeline run {} for tag {} (image {}, container {})",
            run.id, tag, image, container
        );

        self.sync(&mut run, tag).await?;
        self.build(&mut run, &image).await?;
        self.auth(&mut run).await?;
        self.publish(&mut run, &image).await?;
        self.recycle(&mut run, &container).await;
        self.deploy(&mut run, &image, &container).await?;

        let elapsed = Utc::now() - run.started_at;
        info!(
            "Pipeline run {} completed in {}s",
            run.id,
            elapsed.num_seconds()
        );
        Ok(run)
    }

    /// Runs one stage command in the project directory; a failure ends the run.
    async fn require(
        &self,
        run: &mut PipelineRun,
        stage: Stage,
        command: &str,
    ) -> Result<(), PipelineError> {
        run.stage = stage;
        debug!("Stage {}: {}", stage, command);

        let result = self
            .runner
            .run(command, Some(&self.settings.project_dir))
            .await;
        if result.success() {
            Ok(())
        } else {
            warn!(
                "Pipeline run {} failed at stage {}: {}",
                run.id,
                stage,
                result.failure_summary()
            );
            Err(PipelineError::Stage { stage, result })
        }
    }

    async fn sync(&self, run: &mut PipelineRun, tag: &str) -> Result<(), PipelineError> {
        self.require(run, Stage::Sync, "git fetch --all --tags")
            .await?;
        self.require(run, Stage::Sync, "git reset --hard HEAD")
            .await?;
        self.require(run, Stage::Sync, &format!("git checkout {tag}"))
            .await
    }

    async fn build(&self, run: &mut PipelineRun, image: &str) -> Result<(), PipelineError> {
        self.require(run, Stage::Build, &format!("docker build -t {image} ."))
            .await
    }

    async fn auth(&self, run: &mut PipelineRun) -> Result<(), PipelineError> {
        let login = format!(
            "echo \"{}\" | docker login -u \"{}\" --password-stdin",
            self.settings.docker_password, self.settings.docker_username
        );
        self.require(run, Stage::Auth, &login).await
    }

    async fn publish(&self, run: &mut PipelineRun, image: &str) -> Result<(), PipelineError> {
        self.require(run, Stage::Publish, &format!("docker push {image}"))
            .await
    }

    /// Stops and removes any previous container of the same name.
    ///
    /// The container may not exist, so failures here never stop the run.
    async fn recycle(&self, run: &mut PipelineRun, container: &str) {
        run.stage = Stage::Recycle;

        for command in [
            format!("docker stop {container}"),
            format!("docker rm {container}"),
        ] {
            let result = self
                .runner
                .run(&command, Some(&self.settings.project_dir))
                .await;
            if !result.success() {
                debug!(
                    "No container {} to recycle: {}",
                    container,
                    result.failure_summary()
                );
            }
        }
    }

    async fn deploy(
        &self,
        run: &mut PipelineRun,
        image: &str,
        container: &str,
    ) -> Result<(), PipelineError> {
        let command = format!(
            "docker run -d --name {container} -p {host}:{port} -e PORT={port} {image}",
            host = self.settings.host_port,
            port = self.settings.container_port,
        );
        self.require(run, Stage::Deploy, &command).await
    }
}
