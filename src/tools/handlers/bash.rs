// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bash tool handler.
//!
//! Runs shell commands inside a conversation's working directory.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use tracing::{debug, warn};

use crate::error::ToolError;
use crate::tools::registry::{ToolHandler, ToolOutput};
use crate::tools::{parse_arguments, truncate_output, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS};
use crate::types::{InputSchema, ToolDefinition};

/// Tool name under which [`BashHandler`] registers.
pub const BASH_TOOL: &str = "bash";

const MAX_OUTPUT_LINES: usize = 500;

/// Handler for the `bash` tool, bound to one working directory.
#[derive(Debug, Clone)]
pub struct BashHandler {
    working_directory: PathBuf,
}

impl BashHandler {
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}

/// Arguments for the bash tool.
#[derive(Debug, Deserialize)]
struct BashArgs {
    command: String,

    /// Timeout in milliseconds (default: 120000, max: 600000).
    #[serde(default = "default_timeout")]
    timeout: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[async_trait]
impl ToolHandler for BashHandler {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(BASH_TOOL, "Execute a bash command in the working directory")
            .with_schema(
                InputSchema::new()
                    .with_property("command", serde_json::json!({
                        "type": "string",
                        "description": "The bash command to execute"
                    }))
                    .with_property("timeout", serde_json::json!({
                        "type": "integer",
                        "description": "Timeout in milliseconds (default: 120000, max: 600000)"
                    }))
                    .with_required(vec!["command".to_string()]),
            )
    }

    async fn execute(&self, input: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let args: BashArgs = parse_arguments(&input)?;

        if args.command.trim().is_empty() {
            return Err(ToolError::InvalidInput(
                "command must not be empty".to_string(),
            ));
        }

        if !self.working_directory.is_dir() {
            return Err(ToolError::FileNotFound(format!(
                "Working directory does not exist: {}",
                self.working_directory.display()
            )));
        }

        let timeout_duration = Duration::from_millis(args.timeout.min(MAX_TIMEOUT_MS));
        let result = run_bash_command(&args.command, &self.working_directory, timeout_duration).await?;

        if result.timed_out {
            warn!(command = %args.command, "Command timed out");
        } else {
            debug!(
                exit_code = result.exit_code,
                duration_ms = result.duration.as_millis() as u64,
                cwd = %self.working_directory.display(),
                "Command executed"
            );
        }

        Ok(ToolOutput::new(
            format_bash_output(&result),
            result.exit_code == 0 && !result.timed_out,
        ))
    }
}

/// Result of executing a bash command.
#[derive(Debug)]
struct BashResult {
    stdout: String,
    stderr: String,
    exit_code: i32,
    duration: Duration,
    timed_out: bool,
}

async fn run_bash_command(
    command: &str,
    cwd: &Path,
    timeout_duration: Duration,
) -> Result<BashResult, ToolError> {
    let start = Instant::now();

    let mut cmd = Command::new("bash");
    cmd.arg("-c")
        .arg(command)
        .current_dir(cwd)
        .kill_on_drop(true)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());

    let output_result = timeout(timeout_duration, cmd.output()).await;
    let duration = start.elapsed();

    match output_result {
        Ok(Ok(output)) => Ok(BashResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
            duration,
            timed_out: false,
        }),
        Ok(Err(e)) => Err(ToolError::ExecutionFailed(format!(
            "Failed to execute command: {e}"
        ))),
        Err(_) => Ok(BashResult {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: -1,
            duration,
            timed_out: true,
        }),
    }
}

fn format_bash_output(result: &BashResult) -> String {
    let mut parts = Vec::new();

    if result.timed_out {
        parts.push(format!(
            "Command timed out after {:.1}s",
            result.duration.as_secs_f64()
        ));
    }

    if !result.stdout.is_empty() {
        parts.push(truncate_output(&result.stdout, MAX_OUTPUT_LINES));
    }

    if !result.stderr.is_empty() {
        let truncated = truncate_output(&result.stderr, MAX_OUTPUT_LINES / 4);
        parts.push(format!("\n[stderr]\n{truncated}"));
    }

    if result.exit_code != 0 && !result.timed_out {
        parts.push(format!("\n[exit code: {}]", result.exit_code));
    }

    if parts.is_empty() {
        "[No output]".to_string()
    } else {
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn handler_in_temp() -> (BashHandler, tempfile::TempDir) {
        let temp = tempdir().unwrap();
        (BashHandler::new(temp.path()), temp)
    }

    #[tokio::test]
    async fn test_bash_echo() {
        let (handler, _temp) = handler_in_temp();
        let result = handler
            .execute(serde_json::json!({"command": "echo 'hello world'"}))
            .await
            .unwrap();

        assert!(result.is_success());
        assert!(result.content().contains("hello world"));
    }

    #[tokio::test]
    async fn test_bash_runs_in_working_directory() {
        let (handler, temp) = handler_in_temp();
        std::fs::write(temp.path().join("test.txt"), "content").unwrap();

        let result = handler
            .execute(serde_json::json!({"command": "ls"}))
            .await
            .unwrap();

        assert!(result.content().contains("test.txt"));
    }

    #[tokio::test]
    async fn test_bash_exit_code_and_stderr() {
        let (handler, _temp) = handler_in_temp();
        let result = handler
            .execute(serde_json::json!({"command": "echo 'error' >&2; exit 3"}))
            .await
            .unwrap();

        assert!(!result.is_success());
        assert!(result.content().contains("[stderr]"));
        assert!(result.content().contains("exit code: 3"));
        assert!(result.content().contains("error"));
    }

    #[tokio::test]
    async fn test_bash_empty_command() {
        let (handler, _temp) = handler_in_temp();
        let result = handler
            .execute(serde_json::json!({"command": "   \t\n  "}))
            .await;

        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_bash_missing_working_directory() {
        let handler = BashHandler::new("/nonexistent/pine/path");
        let result = handler
            .execute(serde_json::json!({"command": "echo test"}))
            .await;

        assert!(matches!(result, Err(ToolError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_bash_timeout() {
        let (handler, _temp) = handler_in_temp();
        let result = handler
            .execute(serde_json::json!({"command": "sleep 10", "timeout": 100}))
            .await
            .unwrap();

        assert!(!result.is_success());
        assert!(result.content().contains("timed out"));
    }

    #[test]
    fn test_format_bash_output_empty() {
        let result = BashResult {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            duration: Duration::from_millis(100),
            timed_out: false,
        };

        assert_eq!(format_bash_output(&result), "[No output]");
    }
}
