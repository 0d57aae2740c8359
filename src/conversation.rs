// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversation engines.
//!
//! An engine takes a user message, appends whatever it produces to the
//! session transcript, and hands back the new entries. Tool calls run in the
//! working directory the caller derived for the session.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::session::{EntryRole, Session, TranscriptEntry};
use crate::tools::{create_tools, BASH_TOOL};

/// "Send message, receive transcript entries."
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    /// Handle `message` and return the entries appended to `session`.
    async fn send(
        &self,
        session: &mut Session,
        message: &str,
        working_directory: &str,
    ) -> Result<Vec<TranscriptEntry>>;
}

/// Treats every message as a shell command for the bash tool.
#[derive(Debug, Clone)]
pub struct ShellConversation {
    enabled_tools: Vec<String>,
}

impl ShellConversation {
    pub fn new(enabled_tools: Vec<String>) -> Self {
        Self { enabled_tools }
    }
}

impl Default for ShellConversation {
    fn default() -> Self {
        Self::new(vec![BASH_TOOL.to_string()])
    }
}

#[async_trait]
impl ConversationEngine for ShellConversation {
    async fn send(
        &self,
        session: &mut Session,
        message: &str,
        working_directory: &str,
    ) -> Result<Vec<TranscriptEntry>> {
        let first_new = session.transcript_len();
        session.push_entry(EntryRole::User, message);

        let registry = create_tools(&self.enabled_tools, working_directory);
        if !registry.contains(BASH_TOOL) {
            session.push_entry(
                EntryRole::Assistant,
                "The bash tool is disabled, so there is nothing to run.",
            );
            return Ok(session.transcript()[first_new..].to_vec());
        }

        let call = serde_json::json!({ "command": message });
        session.push_entry(
            EntryRole::ToolCall,
            format!("{} {} (in {})", BASH_TOOL, call, working_directory),
        );

        let result = registry.dispatch(BASH_TOOL, call).await?;
        debug!(
            session = %session.id,
            success = result.output.is_success(),
            duration_ms = result.duration.as_millis() as u64,
            "Shell message handled"
        );
        session.push_entry(EntryRole::ToolOutput, result.output.content());

        Ok(session.transcript()[first_new..].to_vec())
    }
}
