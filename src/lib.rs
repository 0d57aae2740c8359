// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pine - a chat prompt with a shell-like working directory.
//!
//! Conversations run shell commands in a working directory that is derived
//! from an append-only log of `/cd` events rather than held in a variable.
//! The input field completes slash commands and `/cd` paths the way a shell
//! does: common prefix first, the full list on the next Tab.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`completion`] - Tab completion: path handling, candidates, strategies, engine
//! - [`commands`] - Slash-command registry and `/cd` submission
//! - [`session`] - Sessions, event log, working-directory resolver, SQLite storage
//! - [`controller`] - Per-input-field controller tying completion to a session
//! - [`conversation`] - Conversation engines ("send message, receive transcript")
//! - [`tools`] - Tool handlers and registry
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - Tracing and metrics
//! - [`error`] - Error types and result aliases
//! - [`repl`] - Raw-mode interactive prompt
//!
//! # Example
//!
//! ```rust,ignore
//! use pine::commands::start_session;
//! use pine::completion::OsFilesystem;
//! use pine::controller::{InputController, SubmitOutcome};
//!
//! let mut controller = InputController::with_os_filesystem(None, "/");
//! let mut session = start_session(None, Some("/srv"), "/", &OsFilesystem);
//!
//! let completion = controller.on_tab("/cd ww", &session);
//! if let SubmitOutcome::DirectoryChanged(event) = controller.submit("/cd www", &mut session) {
//!     println!("{}", event.describe());
//! }
//! ```

pub mod commands;
pub mod completion;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod error;
pub mod repl;
pub mod session;
pub mod telemetry;
pub mod tools;
pub mod types;

// Re-export commonly used types at crate root
pub use completion::{CompletionEngine, CompletionResult};
pub use controller::{InputController, SubmitOutcome};
pub use error::{ChangeDirectoryError, ConfigError, Result, SessionError, ToolError};
pub use session::{DirectoryChangeEvent, EventLog, Session, WorkingDirectoryResolver};
pub use types::ToolDefinition;

/// Pine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
