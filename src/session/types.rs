// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session types: the conversation aggregate and its transcript.

use serde::{Deserialize, Serialize};

use super::events::{DirectoryChangeEvent, EventLog, SessionEvent};

/// Session identifier.
pub type SessionId = String;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRole {
    User,
    Assistant,
    ToolCall,
    ToolOutput,
}

impl EntryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::ToolCall => "tool_call",
            Self::ToolOutput => "tool_output",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "tool_call" => Some(Self::ToolCall),
            "tool_output" => Some(Self::ToolOutput),
            _ => None,
        }
    }
}

/// One entry in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: String,
    pub role: EntryRole,
    pub content: String,
    /// Creation timestamp (Unix epoch seconds).
    pub created_at: i64,
}

impl TranscriptEntry {
    pub fn new(role: EntryRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// A conversation: transcript plus the event log layered onto it.
///
/// The working directory is never stored here. It is derived from the event
/// log by [`WorkingDirectoryResolver`](super::WorkingDirectoryResolver).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub title: Option<String>,
    /// Creation timestamp (Unix epoch seconds).
    pub created_at: i64,
    /// Last update timestamp (Unix epoch seconds).
    pub updated_at: i64,
    transcript: Vec<TranscriptEntry>,
    events: EventLog,
}

impl Session {
    /// Create an empty session with a fresh id.
    pub fn new(title: Option<String>) -> Self {
        Self::with_id(Self::generate_id(), title)
    }

    pub fn with_id(id: SessionId, title: Option<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id,
            title,
            created_at: now,
            updated_at: now,
            transcript: Vec::new(),
            events: EventLog::new(),
        }
    }

    /// Create a session that starts in `directory`.
    ///
    /// The directory is recorded as the first event so the working directory
    /// is derived from the log from the start. It must already be absolute,
    /// standardized and existing; see
    /// [`commands::start_session`](crate::commands::start_session).
    pub(crate) fn starting_in(title: Option<String>, directory: String) -> Self {
        let mut session = Self::new(title);
        session.record_directory_change(None, directory);
        session
    }

    /// Rebuild a persisted session.
    pub(crate) fn restore(
        id: SessionId,
        title: Option<String>,
        created_at: i64,
        updated_at: i64,
        transcript: Vec<TranscriptEntry>,
        events: EventLog,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            updated_at,
            transcript,
            events,
        }
    }

    /// Generate a unique session ID based on timestamp and UUID.
    pub fn generate_id() -> SessionId {
        let now = chrono::Utc::now();
        let short_uuid = &uuid::Uuid::new_v4().to_string()[..8];
        format!("session-{}-{}", now.format("%Y-%m-%d-%H-%M-%S"), short_uuid)
    }

    /// Update the session's updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp();
    }

    /// Title for lists and headers.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ => {
                let date = chrono::DateTime::from_timestamp(self.created_at, 0)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                format!("Session {}", date)
            }
        }
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Current transcript length, the position new events are recorded at.
    pub fn transcript_len(&self) -> usize {
        self.transcript.len()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Append a transcript entry.
    pub fn push_entry(&mut self, role: EntryRole, content: impl Into<String>) -> &TranscriptEntry {
        self.transcript.push(TranscriptEntry::new(role, content));
        self.touch();
        &self.transcript[self.transcript.len() - 1]
    }

    /// Events recorded at or before transcript `position`.
    pub fn events_up_to(&self, position: usize) -> impl DoubleEndedIterator<Item = &SessionEvent> {
        self.events.events_up_to(position)
    }

    /// Append a directory change at the current transcript length.
    ///
    /// Only called with validated targets; see
    /// [`commands::change_directory`](crate::commands::change_directory).
    pub(crate) fn record_directory_change(
        &mut self,
        from_directory: Option<String>,
        to_directory: String,
    ) -> &DirectoryChangeEvent {
        let event = DirectoryChangeEvent::new(from_directory, to_directory, self.transcript.len());
        self.touch();
        match self.events.append(event) {
            SessionEvent::DirectoryChange(event) => event,
        }
    }

    /// Transcript and events in display order.
    pub fn display_entries(&self) -> Vec<DisplayEntry<'_>> {
        interleave(&self.transcript, &self.events)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Session metadata for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub title: Option<String>,
    pub entry_count: u32,
    pub event_count: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SessionInfo {
    /// Format the session info for display.
    pub fn format(&self) -> String {
        let date = chrono::DateTime::from_timestamp(self.updated_at, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let title = self.title.as_deref().unwrap_or("(untitled)");
        format!(
            "{} - {} ({} entries, {} events, {})",
            self.id, title, self.entry_count, self.event_count, date
        )
    }
}

/// A row in the conversation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayEntry<'a> {
    Transcript(&'a TranscriptEntry),
    Event(&'a SessionEvent),
}

/// Merge transcript entries and events chronologically.
///
/// An event at position `i` is shown just before transcript entry `i`; events
/// at or past the end follow the last entry. Event order is kept.
pub fn interleave<'a>(
    transcript: &'a [TranscriptEntry],
    events: &'a EventLog,
) -> Vec<DisplayEntry<'a>> {
    let mut merged = Vec::with_capacity(transcript.len() + events.len());
    let mut pending = events.iter().peekable();

    for (index, entry) in transcript.iter().enumerate() {
        while let Some(event) = pending.next_if(|e| e.transcript_position() <= index) {
            merged.push(DisplayEntry::Event(event));
        }
        merged.push(DisplayEntry::Transcript(entry));
    }
    merged.extend(pending.map(DisplayEntry::Event));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new(Some("Test".to_string()));
        assert!(session.id.starts_with("session-"));
        assert_eq!(session.display_title(), "Test");
        assert!(session.transcript().is_empty());
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_display_title_fallback() {
        let mut session = Session::with_id("s".into(), None);
        session.created_at = 0;
        assert_eq!(session.display_title(), "Session 1970-01-01 00:00");

        session.title = Some("   ".into());
        assert_eq!(session.display_title(), "Session 1970-01-01 00:00");
    }

    #[test]
    fn test_starting_in_records_first_event() {
        let session = Session::starting_in(None, "/srv".into());
        let event = session.events().last_directory_change().unwrap();
        assert_eq!(event.from_directory(), None);
        assert_eq!(event.to_directory(), "/srv");
        assert_eq!(event.transcript_position(), 0);
    }

    #[test]
    fn test_directory_change_uses_transcript_length() {
        let mut session = Session::new(None);
        session.push_entry(EntryRole::User, "ls");
        session.push_entry(EntryRole::ToolOutput, "a b");
        let event = session.record_directory_change(Some("/a".into()), "/b".into());
        assert_eq!(event.transcript_position(), 2);
        assert_eq!(session.events_up_to(1).count(), 0);
        assert_eq!(session.events_up_to(2).count(), 1);
    }

    #[test]
    fn test_interleave_places_events_before_entry() {
        let mut session = Session::starting_in(None, "/a".into());
        session.push_entry(EntryRole::User, "one");
        session.record_directory_change(Some("/a".into()), "/b".into());
        session.push_entry(EntryRole::User, "two");
        session.record_directory_change(Some("/b".into()), "/c".into());

        let rendered: Vec<String> = session
            .display_entries()
            .iter()
            .map(|entry| match entry {
                DisplayEntry::Transcript(t) => t.content.clone(),
                DisplayEntry::Event(e) => e.describe(),
            })
            .collect();

        assert_eq!(
            rendered,
            vec![
                "Changed directory to /a",
                "one",
                "Changed directory from /a to /b",
                "two",
                "Changed directory from /b to /c",
            ]
        );
    }

    #[test]
    fn test_interleave_empty_transcript() {
        let session = Session::starting_in(None, "/a".into());
        let entries = session.display_entries();
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], DisplayEntry::Event(_)));
    }

    #[test]
    fn test_entry_role_round_trip_names() {
        for role in [
            EntryRole::User,
            EntryRole::Assistant,
            EntryRole::ToolCall,
            EntryRole::ToolOutput,
        ] {
            assert_eq!(EntryRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(EntryRole::parse("system"), None);
    }
}
