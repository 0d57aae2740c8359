// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tool system for Pine.
//!
//! Tools run on behalf of a conversation, always inside the working directory
//! derived for it at the time of the call.
//!
//! - [`ToolHandler`] trait - Core abstraction for tool implementations
//! - [`ToolRegistry`] - Maps tool names to handlers, dispatches calls
//! - [`create_tools`] - Builds the configured tool set for a directory
//!
//! # Example
//!
//! ```rust,ignore
//! use pine::tools::create_tools;
//!
//! let registry = create_tools(&["bash".to_string()], "/srv/www");
//! let output = registry.dispatch("bash", json!({"command": "ls"})).await?;
//! ```

pub mod handlers;
pub mod registry;

pub use handlers::{BashHandler, BASH_TOOL};
pub use registry::{DispatchResult, ToolHandler, ToolOutput, ToolRegistry, ToolRegistryBuilder};

use serde::Deserialize;
use tracing::debug;

use crate::error::ToolError;

/// Parse JSON arguments into a typed struct.
pub fn parse_arguments<T>(arguments: &serde_json::Value) -> Result<T, ToolError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(arguments.clone())
        .map_err(|err| ToolError::InvalidInput(format!("Failed to parse arguments: {err}")))
}

/// Default timeout for command execution in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000; // 2 minutes

/// Maximum timeout for command execution in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 600_000; // 10 minutes

/// Build the registry for `enabled_tools`, bound to `working_directory`.
///
/// Unknown names are skipped. A name listed twice registers once.
pub fn create_tools(enabled_tools: &[String], working_directory: &str) -> ToolRegistry {
    let mut builder = ToolRegistryBuilder::new();
    for name in enabled_tools {
        match name.as_str() {
            BASH_TOOL => {
                builder.register(BashHandler::new(working_directory));
            }
            other => debug!(tool = other, "Ignoring unknown tool"),
        }
    }
    builder.build()
}

/// Truncate output by lines, keeping first and last portions.
pub fn truncate_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let total = lines.len();

    if total <= max_lines {
        return output.to_string();
    }

    let keep = max_lines / 2;
    let first_part: Vec<&str> = lines.iter().take(keep).copied().collect();
    let last_part: Vec<&str> = lines.iter().skip(total - keep).copied().collect();
    let omitted = total - keep * 2;

    format!(
        "{}\n\n... [{omitted} lines omitted] ...\n\n{}",
        first_part.join("\n"),
        last_part.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tools_known_and_unknown() {
        let registry = create_tools(
            &["bash".to_string(), "teleport".to_string(), "bash".to_string()],
            "/tmp",
        );
        assert!(registry.contains("bash"));
        assert!(!registry.contains("teleport"));
    }

    #[test]
    fn test_create_tools_empty() {
        let registry = create_tools(&[], "/tmp");
        assert!(!registry.contains("bash"));
    }

    #[test]
    fn test_truncate_output_short() {
        let output = "line1\nline2\nline3";
        assert_eq!(truncate_output(output, 10), output);
    }

    #[test]
    fn test_truncate_output_long() {
        let lines: Vec<String> = (1..=20).map(|i| format!("line{i}")).collect();
        let output = lines.join("\n");
        let truncated = truncate_output(&output, 6);
        assert!(truncated.contains("line1\n"));
        assert!(truncated.contains("line20"));
        assert!(truncated.contains("[14 lines omitted]"));
    }

    #[test]
    fn test_parse_arguments_invalid() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct TestArgs {
            required_field: String,
        }

        let value = serde_json::json!({"wrong_field": "value"});
        let result: Result<TestArgs, _> = parse_arguments(&value);
        assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    }
}
