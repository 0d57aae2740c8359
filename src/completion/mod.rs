// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tab completion for the chat input field.
//!
//! Shell-like completion for slash commands and for the directory argument of
//! `/cd`:
//! - Command name completion (`/c<TAB>` -> `/cd `)
//! - Directory completion (`/cd /us<TAB>` -> `/cd /usr/`)
//! - Progressive narrowing: common prefix first, full list on the next press
//!
//! ```text
//! tab press ──► CompletionEngine ──► CompletionStrategy (first that claims input)
//!                    │                    │
//!                    │                    ├─ path::{expand, split, standardize}
//!                    │                    └─ CandidateSource::list (the only I/O)
//!                    ▼
//!      NoMatches | SingleMatch | CommonPrefix | ShowAll
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use pine::completion::{CompletionEngine, CompletionResult};
//!
//! let mut engine = CompletionEngine::default();
//! match engine.complete("/cd /us", "/home/me") {
//!     CompletionResult::SingleMatch(text) | CompletionResult::CommonPrefix(text) => {
//!         println!("replace input with {text}");
//!     }
//!     CompletionResult::ShowAll(candidates) => println!("{}", candidates.join("  ")),
//!     CompletionResult::NoMatches => {}
//! }
//! ```

pub mod candidates;
pub mod engine;
pub mod path;
pub mod strategy;

pub use candidates::{CandidateSource, DirectoryEntry, Filesystem, OsFilesystem};
pub use engine::{find_common_prefix, CompletionEngine, CompletionResult, CompletionState};
pub use strategy::{
    default_strategies, CommandStrategy, CompletionForm, CompletionStrategy,
    DirectoryPathStrategy,
};
