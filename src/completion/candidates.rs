// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Directory candidates for path completion.
//!
//! [`CandidateSource::list`] is the only place in the completion path that
//! performs I/O. Listing failures of any kind collapse to an empty result.

use std::io;
use std::sync::Arc;
#[cfg(feature = "telemetry")]
use std::time::Instant;

use tracing::trace;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

/// One entry returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    /// True for directories and for symlinks that resolve to a directory.
    pub is_directory: bool,
}

impl DirectoryEntry {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }
}

/// Filesystem access used by completion and working-directory resolution.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// List the entries of an absolute directory path.
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirectoryEntry>>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Whether `path` exists and is a directory (following symlinks).
    fn is_directory(&self, path: &str) -> bool;
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let Ok(entry) = entry else { continue };
            let name = entry.file_name().to_string_lossy().into_owned();
            // fs::metadata follows symlinks, entry.file_type() would not
            let is_directory = std::fs::metadata(entry.path())
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push(DirectoryEntry { name, is_directory });
        }
        Ok(entries)
    }

    fn exists(&self, path: &str) -> bool {
        std::path::Path::new(path).exists()
    }

    fn is_directory(&self, path: &str) -> bool {
        std::path::Path::new(path).is_dir()
    }
}

/// Produces directory-name candidates for a directory and typed prefix.
#[derive(Clone)]
pub struct CandidateSource {
    fs: Arc<dyn Filesystem>,
}

impl CandidateSource {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Candidate subdirectory names of `directory` that start with `prefix`.
    ///
    /// Matching is case-insensitive. Names starting with `.` are skipped unless
    /// `prefix` itself starts with `.`. The result is sorted case-insensitively
    /// and is empty when the directory cannot be listed.
    pub fn list(&self, directory: &str, prefix: &str) -> Vec<String> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let entries = match self.fs.list_directory(directory) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(directory, error = %e, "Directory not listable, no candidates");
                return Vec::new();
            }
        };

        let show_hidden = prefix.starts_with('.');
        let folded_prefix = prefix.to_lowercase();

        let mut names: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.is_directory)
            .filter(|entry| show_hidden || !entry.name.starts_with('.'))
            .filter(|entry| entry.name.to_lowercase().starts_with(&folded_prefix))
            .map(|entry| entry.name)
            .collect();

        sort_case_insensitive(&mut names);

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("completion.candidates", start.elapsed());

        trace!(directory, prefix, count = names.len(), "Listed directory candidates");
        names
    }
}

impl Default for CandidateSource {
    fn default() -> Self {
        Self::new(Arc::new(OsFilesystem))
    }
}

/// Sort ascending ignoring case (ties broken by the raw string) and drop duplicates.
pub fn sort_case_insensitive(names: &mut Vec<String>) {
    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    names.dedup();
}
