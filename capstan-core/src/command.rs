//! Captured external-command results

use serde::{Deserialize, Serialize};

/// Exit condition of one external command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    Success,
    /// Non-zero exit, or `None` when the process produced no exit code
    /// (spawn failure, timeout, killed by a signal)
    Failed(Option<i32>),
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        matches!(self, CommandStatus::Success)
    }
}

/// Captured output of one external command
///
/// Produced and consumed within a single runner invocation; the pipeline
/// keeps the one belonging to a failed stage as the failure cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: CommandStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Short description of a failure for logs and error responses.
    pub fn failure_summary(&self) -> String {
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };

        match self.status {
            CommandStatus::Success => "succeeded".to_string(),
            CommandStatus::Failed(Some(code)) if detail.is_empty() => {
                format!("exit code {code}")
            }
            CommandStatus::Failed(Some(code)) => format!("exit code {code}: {detail}"),
            CommandStatus::Failed(None) if detail.is_empty() => {
                "terminated without an exit code".to_string()
            }
            CommandStatus::Failed(None) => detail.to_string(),
        }
    }
}
