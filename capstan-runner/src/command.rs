//! Shell command execution
//!
//! Runs one external command to completion and captures its output.
//! Failures never propagate as errors: spawn failures and timeouts surface
//! through [`CommandStatus`] like any non-zero exit, and each caller
//! decides what a failure means for its stage.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use capstan_core::command::{CommandResult, CommandStatus};
use tokio::process::Command;
use tracing::{debug, warn};

/// Executes external commands on behalf of the workspace and the pipeline.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` in the OS shell and captures its output.
    ///
    /// # Arguments
    /// * `command` - Shell command line to execute
    /// * `cwd` - Working directory for the child process. The process-wide
    ///   working directory is never mutated; every invocation carries its
    ///   own directory explicitly.
    async fn run(&self, command: &str, cwd: Option<&Path>) -> CommandResult;
}

/// Standard runner backed by `sh -c`, with a bounded timeout per command.
///
/// A command that outlives the timeout is killed and reported as a failure;
/// without the bound a hung external process would stall the webhook
/// request indefinitely.
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str, cwd: Option<&Path>) -> CommandResult {
        debug!("Executing: {}", command);

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).kill_on_drop(true);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Failed to spawn '{}': {}", command, e);
                return CommandResult {
                    stdout: String::new(),
                    stderr: format!("failed to spawn command: {e}"),
                    status: CommandStatus::Failed(None),
                };
            }
            Err(_) => {
                warn!("Command '{}' timed out after {:?}", command, self.timeout);
                return CommandResult {
                    stdout: String::new(),
                    stderr: format!("command timed out after {}s", self.timeout.as_secs()),
                    status: CommandStatus::Failed(None),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            debug!("stdout: {}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("stderr: {}", stderr.trim());
        }

        let status = if output.status.success() {
            CommandStatus::Success
        } else {
            let code = output.status.code();
            debug!("Command failed: {} (exit code {:?})", command, code);
            CommandStatus::Failed(code)
        };

        CommandResult {
            stdout,
            stderr,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> ShellRunner {
        ShellRunner::new(Duration::from_secs(10))
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let result = runner().run("echo hello", None).await;

        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_captures_stderr_separately() {
        let result = runner().run("echo oops >&2", None).await;

        assert!(result.success());
        assert!(result.stdout.is_empty());
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let result = runner().run("exit 3", None).await;

        assert_eq!(result.status, CommandStatus::Failed(Some(3)));
    }

    #[tokio::test]
    async fn test_run_uses_explicit_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = runner().run("pwd", Some(dir.path())).await;

        assert!(result.success());
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(reported, expected);
    }

    #[tokio::test]
    async fn test_run_times_out_hung_commands() {
        let result = ShellRunner::new(Duration::from_millis(100))
            .run("sleep 5", None)
            .await;

        assert_eq!(result.status, CommandStatus::Failed(None));
        assert!(result.stderr.contains("timed out"));
    }
}
