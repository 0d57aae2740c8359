// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for Pine.
//!
//! This module provides strongly-typed errors for different parts of the application,
//! using `thiserror` for ergonomic error definitions and `anyhow` for error propagation.
//!
//! Tab completion has no error type on purpose: an empty or unreadable directory
//! surfaces as [`CompletionResult::NoMatches`](crate::completion::CompletionResult).
//! Only `/cd` submission produces an explicit failure, [`ChangeDirectoryError`].

use thiserror::Error;

/// Reasons a `/cd` submission is declined.
///
/// The `Display` output is the human-readable reason shown to the user.
/// A declined change never appends an event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangeDirectoryError {
    #[error("No target directory given and the home directory is unknown")]
    MissingArgument,

    #[error("Directory does not exist: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),
}

impl ChangeDirectoryError {
    /// The path the user asked for, if there was one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingArgument => None,
            Self::NotFound(path) | Self::NotADirectory(path) => Some(path),
        }
    }
}

/// Errors that can occur during tool execution.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Errors that can occur during session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Failed to save session: {0}")]
    SaveFailed(String),

    #[error("Failed to load session: {0}")]
    LoadFailed(String),

    #[error("Session corrupted: {0}")]
    Corrupted(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_directory_error_display() {
        let err = ChangeDirectoryError::NotFound("/nonexistent".to_string());
        assert_eq!(err.to_string(), "Directory does not exist: /nonexistent");
        assert_eq!(err.path(), Some("/nonexistent"));

        let err = ChangeDirectoryError::NotADirectory("/etc/hosts".to_string());
        assert!(err.to_string().contains("/etc/hosts"));
        assert_eq!(ChangeDirectoryError::MissingArgument.path(), None);
    }

    #[test]
    fn test_tool_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let tool_err: ToolError = io_err.into();
        assert!(matches!(tool_err, ToolError::FileNotFound(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let tool_err: ToolError = io_err.into();
        assert!(matches!(tool_err, ToolError::PermissionDenied(_)));
    }

    #[test]
    fn test_config_error_from_json() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid json");
        let json_err = result.unwrap_err();
        let config_err: ConfigError = json_err.into();
        assert!(matches!(config_err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_session_error_from_sqlite() {
        let err: SessionError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, SessionError::Database(_)));
    }
}
