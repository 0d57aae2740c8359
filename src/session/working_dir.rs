// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Working-directory derivation.
//!
//! A conversation has no mutable "current directory". Its directory is
//! computed on demand from the event log, falling back to the configured
//! directory and then to the process default:
//!
//! 1. the newest directory change (at or before the position) whose target
//!    is still a directory, walking backward past removed ones
//! 2. the configured directory, if set, non-empty and a directory
//! 3. the process default
//!
//! Existence is checked on every call. Nothing is cached.

use std::sync::Arc;
#[cfg(feature = "telemetry")]
use std::time::Instant;

use tracing::{debug, trace};

use crate::completion::{Filesystem, OsFilesystem};

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

use super::events::EventLog;

/// Which tier supplied a resolved directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectorySource {
    Event,
    Configured,
    ProcessDefault,
}

/// A resolved working directory and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirectory {
    pub path: String,
    pub source: DirectorySource,
}

/// Derives a conversation's working directory from its event log.
#[derive(Clone)]
pub struct WorkingDirectoryResolver {
    fs: Arc<dyn Filesystem>,
}

impl WorkingDirectoryResolver {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Working directory after every event in `events`.
    pub fn resolve(
        &self,
        events: &EventLog,
        configured: Option<&str>,
        process_default: &str,
    ) -> String {
        self.resolve_with_source(events, usize::MAX, configured, process_default)
            .path
    }

    /// Working directory as of transcript `position`.
    pub fn resolve_at(
        &self,
        events: &EventLog,
        position: usize,
        configured: Option<&str>,
        process_default: &str,
    ) -> String {
        self.resolve_with_source(events, position, configured, process_default)
            .path
    }

    /// Like [`resolve_at`](Self::resolve_at), also reporting the tier used.
    pub fn resolve_with_source(
        &self,
        events: &EventLog,
        position: usize,
        configured: Option<&str>,
        process_default: &str,
    ) -> ResolvedDirectory {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let resolved = self.pick(events, position, configured, process_default);

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("working_dir.resolve", start.elapsed());

        debug!(path = %resolved.path, source = ?resolved.source, "Resolved working directory");
        resolved
    }

    fn pick(
        &self,
        events: &EventLog,
        position: usize,
        configured: Option<&str>,
        process_default: &str,
    ) -> ResolvedDirectory {
        for event in events.directory_changes_up_to(position).rev() {
            let target = event.to_directory();
            if self.fs.is_directory(target) {
                return ResolvedDirectory {
                    path: target.to_string(),
                    source: DirectorySource::Event,
                };
            }
            trace!(directory = target, "Logged directory is gone, trying older events");
        }

        if let Some(configured) = configured.filter(|dir| !dir.is_empty()) {
            if self.fs.is_directory(configured) {
                return ResolvedDirectory {
                    path: configured.to_string(),
                    source: DirectorySource::Configured,
                };
            }
            trace!(directory = configured, "Configured directory is not usable");
        }

        ResolvedDirectory {
            path: process_default.to_string(),
            source: DirectorySource::ProcessDefault,
        }
    }
}

impl Default for WorkingDirectoryResolver {
    fn default() -> Self {
        Self::new(Arc::new(OsFilesystem))
    }
}

/// The process's own current directory, or the root if that is unavailable.
pub fn process_default_directory() -> String {
    std::env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|_| crate::completion::path::ROOT.to_string())
}
