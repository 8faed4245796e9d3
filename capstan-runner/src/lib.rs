//! Capstan Runner
//!
//! Everything in capstan that touches the outside world: shell command
//! execution, the git workspace checkout, and the deploy pipeline state
//! machine.
//!
//! All execution goes through the [`CommandRunner`] trait so the workspace
//! and pipeline logic can be exercised against a scripted runner in tests.

pub mod command;
pub mod pipeline;
pub mod workspace;

#[cfg(test)]
mod testing;

// Re-export the runner trait and implementations
pub use command::{CommandRunner, ShellRunner};
pub use pipeline::{DeployPipeline, DeploySettings, PipelineError};
pub use workspace::{Workspace, WorkspaceError};
