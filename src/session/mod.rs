// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversation sessions and their event-sourced working directory.
//!
//! - **Types**: [`Session`], [`TranscriptEntry`], [`DisplayEntry`]
//! - **Events**: [`DirectoryChangeEvent`] in an append-only [`EventLog`]
//! - **Working directory**: [`WorkingDirectoryResolver`] derives it from the log
//! - **Storage**: SQLite persistence
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │           Session            │
//! │  transcript ─┐   events ─┐   │
//! └──────────────┼───────────┼───┘
//!                │           ▼
//!                │   WorkingDirectoryResolver ──► current directory
//!                ▼
//!          interleave() ──► conversation view
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pine::commands::start_session;
//! use pine::completion::OsFilesystem;
//! use pine::session::WorkingDirectoryResolver;
//!
//! let session = start_session(None, Some("/srv"), "/", &OsFilesystem);
//! let resolver = WorkingDirectoryResolver::default();
//! let cwd = resolver.resolve(session.events(), None, "/");
//! ```

pub mod events;
pub mod storage;
pub mod types;
pub mod working_dir;

pub use events::{DirectoryChangeEvent, EventId, EventLog, SessionEvent};
pub use storage::{default_database_path, SessionStorage, SCHEMA_VERSION};
pub use types::{
    interleave, DisplayEntry, EntryRole, Session, SessionId, SessionInfo, TranscriptEntry,
};
pub use working_dir::{
    process_default_directory, DirectorySource, ResolvedDirectory, WorkingDirectoryResolver,
};
