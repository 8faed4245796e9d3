//! Test support: a scripted command runner
//!
//! Resolves commands against substring rules and records every invocation,
//! so workspace and pipeline tests can assert on exactly which commands ran
//! and in which directory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use capstan_core::command::{CommandResult, CommandStatus};

use crate::command::CommandRunner;

pub fn ok(stdout: &str) -> CommandResult {
    CommandResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        status: CommandStatus::Success,
    }
}

pub fn failed(code: i32, stderr: &str) -> CommandResult {
    CommandResult {
        stdout: String::new(),
        stderr: stderr.to_string(),
        status: CommandStatus::Failed(Some(code)),
    }
}

/// Command runner that answers from substring rules; unmatched commands
/// succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<(String, CommandResult)>,
    calls: Mutex<Vec<(String, Option<PathBuf>)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers any command containing `needle` with `result`.
    pub fn on(mut self, needle: &str, result: CommandResult) -> Self {
        self.rules.push((needle.to_string(), result));
        self
    }

    /// Commands executed so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    /// Working directories of the executed commands, in order.
    pub fn cwds(&self) -> Vec<Option<PathBuf>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str, cwd: Option<&Path>) -> CommandResult {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), cwd.map(Path::to_path_buf)));

        self.rules
            .iter()
            .find(|(needle, _)| command.contains(needle.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| ok(""))
    }
}
