// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Session events layered onto the conversation transcript.
//!
//! Events are immutable and only ever appended. Each one remembers the
//! transcript length at the moment it happened so it can be shown in place
//! without touching transcript entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a session event.
pub type EventId = Uuid;

/// The working directory of a conversation changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryChangeEvent {
    id: EventId,
    from_directory: Option<String>,
    to_directory: String,
    transcript_position: usize,
}

impl DirectoryChangeEvent {
    /// Build an event for an already validated target directory.
    ///
    /// `to_directory` must be absolute, standardized and existing; use
    /// [`crate::commands::change_directory`] rather than calling this directly.
    pub(crate) fn new(
        from_directory: Option<String>,
        to_directory: String,
        transcript_position: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_directory,
            to_directory,
            transcript_position,
        }
    }

    /// Rebuild a persisted event.
    pub(crate) fn restore(
        id: EventId,
        from_directory: Option<String>,
        to_directory: String,
        transcript_position: usize,
    ) -> Self {
        Self {
            id,
            from_directory,
            to_directory,
            transcript_position,
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    /// The directory in effect before the change, if there was one.
    pub fn from_directory(&self) -> Option<&str> {
        self.from_directory.as_deref()
    }

    pub fn to_directory(&self) -> &str {
        &self.to_directory
    }

    /// Transcript length when the change happened.
    pub fn transcript_position(&self) -> usize {
        self.transcript_position
    }

    /// One-line description for the conversation view.
    pub fn describe(&self) -> String {
        match &self.from_directory {
            Some(from) => format!("Changed directory from {} to {}", from, self.to_directory),
            None => format!("Changed directory to {}", self.to_directory),
        }
    }
}

/// Anything recorded in a session's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DirectoryChange(DirectoryChangeEvent),
}

impl SessionEvent {
    pub fn id(&self) -> EventId {
        match self {
            Self::DirectoryChange(event) => event.id(),
        }
    }

    pub fn transcript_position(&self) -> usize {
        match self {
            Self::DirectoryChange(event) => event.transcript_position(),
        }
    }

    pub fn as_directory_change(&self) -> Option<&DirectoryChangeEvent> {
        match self {
            Self::DirectoryChange(event) => Some(event),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::DirectoryChange(event) => event.describe(),
        }
    }
}

impl From<DirectoryChangeEvent> for SessionEvent {
    fn from(event: DirectoryChangeEvent) -> Self {
        Self::DirectoryChange(event)
    }
}

/// Append-only, insertion-ordered log of session events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<SessionEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Insertion order is chronological order.
    pub fn append(&mut self, event: impl Into<SessionEvent>) -> &SessionEvent {
        self.events.push(event.into());
        &self.events[self.events.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SessionEvent> {
        self.events.iter()
    }

    /// Events recorded at or before transcript `position`, oldest first.
    pub fn events_up_to(&self, position: usize) -> impl DoubleEndedIterator<Item = &SessionEvent> {
        self.events
            .iter()
            .filter(move |event| event.transcript_position() <= position)
    }

    /// Directory changes at or before `position`, oldest first.
    pub fn directory_changes_up_to(
        &self,
        position: usize,
    ) -> impl DoubleEndedIterator<Item = &DirectoryChangeEvent> {
        self.events_up_to(position)
            .filter_map(SessionEvent::as_directory_change)
    }

    /// The most recent directory change, regardless of whether it still exists.
    pub fn last_directory_change(&self) -> Option<&DirectoryChangeEvent> {
        self.events
            .iter()
            .rev()
            .find_map(SessionEvent::as_directory_change)
    }
}

impl FromIterator<SessionEvent> for EventLog {
    fn from_iter<I: IntoIterator<Item = SessionEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(to: &str, position: usize) -> DirectoryChangeEvent {
        DirectoryChangeEvent::new(None, to.to_string(), position)
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = EventLog::new();
        log.append(change("/a", 0));
        log.append(change("/b", 2));
        log.append(change("/c", 2));

        let targets: Vec<_> = log
            .directory_changes_up_to(usize::MAX)
            .map(|e| e.to_directory())
            .collect();
        assert_eq!(targets, vec!["/a", "/b", "/c"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_events_up_to_filters_by_position() {
        let mut log = EventLog::new();
        log.append(change("/a", 0));
        log.append(change("/b", 3));
        log.append(change("/c", 5));

        let targets: Vec<_> = log
            .directory_changes_up_to(3)
            .map(|e| e.to_directory())
            .collect();
        assert_eq!(targets, vec!["/a", "/b"]);
        assert_eq!(log.events_up_to(0).count(), 1);
    }

    #[test]
    fn test_last_directory_change() {
        let mut log = EventLog::new();
        assert!(log.last_directory_change().is_none());

        log.append(change("/a", 0));
        log.append(change("/b", 1));
        assert_eq!(log.last_directory_change().map(|e| e.to_directory()), Some("/b"));
    }

    #[test]
    fn test_describe() {
        let first = change("/srv", 0);
        insta::assert_snapshot!(first.describe(), @"Changed directory to /srv");

        let second = DirectoryChangeEvent::new(Some("/srv".into()), "/srv/www".into(), 4);
        insta::assert_snapshot!(
            SessionEvent::from(second).describe(),
            @"Changed directory from /srv to /srv/www"
        );
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = SessionEvent::from(change("/tmp", 7));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "directory_change");
        assert_eq!(json["to_directory"], "/tmp");
        assert_eq!(json["transcript_position"], 7);

        let back: SessionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
