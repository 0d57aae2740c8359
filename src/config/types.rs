// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of workspace and resolved configuration,
//! supporting JSON and YAML formats.

use serde::{Deserialize, Serialize};

/// Workspace configuration for Pine.
/// Can be defined in .pine.json or .pine/config.json in the project root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Directory new conversations start in when the log has none
    #[serde(
        default,
        alias = "working_directory",
        skip_serializing_if = "Option::is_none"
    )]
    pub working_directory: Option<String>,

    /// Tools the conversation may run (currently only "bash")
    #[serde(default, alias = "enabled_tools", skip_serializing_if = "Option::is_none")]
    pub enabled_tools: Option<Vec<String>>,

    /// Path of the session database
    #[serde(default, alias = "session_database", skip_serializing_if = "Option::is_none")]
    pub session_database: Option<String>,
}

/// Fully resolved configuration after merging all sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    /// Never an empty string; empty values are dropped while merging.
    pub working_directory: Option<String>,
    pub enabled_tools: Vec<String>,
    pub session_database: Option<String>,
}

impl ResolvedConfig {
    /// The configured working directory, if any.
    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            working_directory: None,
            enabled_tools: vec!["bash".to_string()],
            session_database: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_config_default() {
        let config = WorkspaceConfig::default();
        assert!(config.working_directory.is_none());
        assert!(config.enabled_tools.is_none());
    }

    #[test]
    fn test_workspace_config_camel_case() {
        let json = r#"{
            "workingDirectory": "/srv",
            "enabledTools": ["bash"],
            "sessionDatabase": "/tmp/s.db"
        }"#;

        let config: WorkspaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.working_directory.as_deref(), Some("/srv"));
        assert_eq!(config.enabled_tools, Some(vec!["bash".to_string()]));
        assert_eq!(config.session_database.as_deref(), Some("/tmp/s.db"));
    }

    #[test]
    fn test_workspace_config_snake_case_aliases() {
        let yaml = "working_directory: /srv\nenabled_tools: [bash]\nsession_database: /tmp/s.db\n";
        let config: WorkspaceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.working_directory.as_deref(), Some("/srv"));
        assert_eq!(config.enabled_tools, Some(vec!["bash".to_string()]));
        assert_eq!(config.session_database.as_deref(), Some("/tmp/s.db"));
    }

    #[test]
    fn test_serialization_skips_unset() {
        let config = WorkspaceConfig {
            working_directory: Some("/srv".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"workingDirectory":"/srv"}"#);
    }

    #[test]
    fn test_resolved_defaults() {
        let config = ResolvedConfig::default();
        assert_eq!(config.enabled_tools, vec!["bash"]);
        assert!(config.working_directory().is_none());
    }
}
