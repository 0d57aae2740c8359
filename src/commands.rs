// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Slash commands available in the input field.
//!
//! The registry is a fixed list. It feeds command-name completion and decides
//! which commands get directory completion for their argument.

use tracing::{debug, warn};

use crate::completion::path;
use crate::completion::Filesystem;
use crate::error::ChangeDirectoryError;
use crate::session::{DirectoryChangeEvent, Session};

/// What a command expects after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    None,
    DirectoryPath,
}

/// A registered slash command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub argument: ArgumentKind,
}

pub const CD: &str = "/cd";
pub const PWD: &str = "/pwd";
pub const HELP: &str = "/help";
pub const METRICS: &str = "/metrics";
pub const EXIT: &str = "/exit";

/// All slash commands, in help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: CD,
        usage: "/cd [path]",
        description: "Change the conversation's working directory",
        argument: ArgumentKind::DirectoryPath,
    },
    CommandSpec {
        name: PWD,
        usage: "/pwd",
        description: "Show the current working directory",
        argument: ArgumentKind::None,
    },
    CommandSpec {
        name: HELP,
        usage: "/help",
        description: "List available commands",
        argument: ArgumentKind::None,
    },
    CommandSpec {
        name: METRICS,
        usage: "/metrics",
        description: "Show completion and storage timings",
        argument: ArgumentKind::None,
    },
    CommandSpec {
        name: EXIT,
        usage: "/exit",
        description: "Leave the session",
        argument: ArgumentKind::None,
    },
];

/// Look up a command by its exact name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Split slash-command input into `(command, arguments)`.
///
/// Returns `None` for input that is not a slash command.
pub fn parse(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((command, args)) => Some((command, args.trim())),
        None => Some((trimmed, "")),
    }
}

/// Rendered `/help` output.
pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|c| c.usage.len()).max().unwrap_or(0);
    let mut text = String::from("Commands:\n");
    for command in COMMANDS {
        text.push_str(&format!(
            "  {:width$}  {}\n",
            command.usage,
            command.description,
            width = width
        ));
    }
    text
}

/// Turn a `/cd` argument into an absolute, standardized path.
///
/// An empty argument means the home directory.
pub fn resolve_target(argument: &str, base_directory: &str) -> Result<String, ChangeDirectoryError> {
    resolve_target_with_home(argument, base_directory, path::home_directory().as_deref())
}

fn resolve_target_with_home(
    argument: &str,
    base_directory: &str,
    home: Option<&str>,
) -> Result<String, ChangeDirectoryError> {
    let argument = argument.trim();
    let expanded = if argument.is_empty() {
        home.ok_or(ChangeDirectoryError::MissingArgument)?.to_string()
    } else {
        path::expand_with_home(argument, base_directory, home)
    };
    Ok(path::standardize(&expanded))
}

/// Validate a `/cd` target and record it on the session.
///
/// `base_directory` is the working directory derived for the session right
/// now; it becomes the event's `from_directory`. Nothing is recorded when the
/// target is missing or not a directory.
pub fn change_directory(
    session: &mut Session,
    argument: &str,
    base_directory: &str,
    fs: &dyn Filesystem,
) -> Result<DirectoryChangeEvent, ChangeDirectoryError> {
    let target = resolve_target(argument, base_directory)?;
    validate_directory(&target, fs)?;

    let event = session
        .record_directory_change(Some(base_directory.to_string()), target)
        .clone();
    debug!(
        session = %session.id,
        to = event.to_directory(),
        position = event.transcript_position(),
        "Working directory changed"
    );
    Ok(event)
}

/// Resolve a configured or command-line starting directory.
///
/// `requested` is read like a `/cd` argument relative to `process_default`.
/// Returns the absolute, standardized path when it is an existing directory.
pub fn resolve_start_directory(
    requested: &str,
    process_default: &str,
    fs: &dyn Filesystem,
) -> Option<String> {
    let requested = requested.trim();
    if requested.is_empty() {
        return None;
    }
    let resolved = resolve_target(requested, process_default)
        .and_then(|target| validate_directory(&target, fs).map(|()| target));
    match resolved {
        Ok(target) => Some(target),
        Err(e) => {
            warn!(directory = requested, error = %e, "Ignoring starting directory");
            None
        }
    }
}

/// A new session whose first event records where it starts.
///
/// The session starts in `requested` when [`resolve_start_directory`] accepts
/// it, otherwise in `process_default`.
pub fn start_session(
    title: Option<String>,
    requested: Option<&str>,
    process_default: &str,
    fs: &dyn Filesystem,
) -> Session {
    let directory = requested
        .and_then(|dir| resolve_start_directory(dir, process_default, fs))
        .unwrap_or_else(|| path::standardize(process_default));
    Session::starting_in(title, directory)
}

/// Check that `target` exists and is a directory.
pub fn validate_directory(target: &str, fs: &dyn Filesystem) -> Result<(), ChangeDirectoryError> {
    if !fs.exists(target) {
        return Err(ChangeDirectoryError::NotFound(target.to_string()));
    }
    if !fs.is_directory(target) {
        return Err(ChangeDirectoryError::NotADirectory(target.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::OsFilesystem;
    use tempfile::TempDir;

    #[test]
    fn test_registry_shape() {
        let path_commands: Vec<_> = COMMANDS
            .iter()
            .filter(|c| c.argument == ArgumentKind::DirectoryPath)
            .map(|c| c.name)
            .collect();
        assert_eq!(path_commands, vec!["/cd"]);
        assert!(COMMANDS.iter().all(|c| c.name.starts_with('/')));
    }

    #[test]
    fn test_find_is_exact() {
        assert_eq!(find("/cd").map(|c| c.name), Some("/cd"));
        assert!(find("/CD").is_none());
        assert!(find("/Exit").is_none());
        assert!(find("/nope").is_none());
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("/cd /tmp"), Some(("/cd", "/tmp")));
        assert_eq!(parse("  /pwd  "), Some(("/pwd", "")));
        assert_eq!(parse("/cd    spaced dir "), Some(("/cd", "spaced dir")));
        assert_eq!(parse("hello /cd"), None);
    }

    #[test]
    fn test_help_text_lists_commands() {
        let help = help_text();
        for command in COMMANDS {
            assert!(help.contains(command.usage));
        }
    }

    #[test]
    fn test_resolve_target() {
        let home = Some("/home/me");
        assert_eq!(
            resolve_target_with_home("", "/srv", home),
            Ok("/home/me".to_string())
        );
        assert_eq!(
            resolve_target_with_home("~/code/../notes", "/srv", home),
            Ok("/home/me/notes".to_string())
        );
        assert_eq!(
            resolve_target_with_home("www/", "/srv", home),
            Ok("/srv/www".to_string())
        );
        assert_eq!(
            resolve_target_with_home("..", "/srv", home),
            Ok("/".to_string())
        );
        assert_eq!(
            resolve_target_with_home("", "/srv", None),
            Err(ChangeDirectoryError::MissingArgument)
        );
    }

    #[test]
    fn test_change_directory_records_event() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("project")).unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        let mut session = Session::new(None);
        let event = change_directory(&mut session, "project", &base, &OsFilesystem).unwrap();

        assert_eq!(event.to_directory(), format!("{}/project", base));
        assert_eq!(event.from_directory(), Some(base.as_str()));
        assert_eq!(event.transcript_position(), 0);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_change_directory_declines_missing_target() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        let mut session = Session::new(None);
        let err = change_directory(&mut session, "/nonexistent/pine", &base, &OsFilesystem)
            .unwrap_err();

        assert_eq!(err, ChangeDirectoryError::NotFound("/nonexistent/pine".into()));
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_change_directory_declines_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        let mut session = Session::new(None);
        let err = change_directory(&mut session, "notes.txt", &base, &OsFilesystem).unwrap_err();

        assert!(matches!(err, ChangeDirectoryError::NotADirectory(_)));
        assert!(session.events().is_empty());
    }

    #[test]
    fn test_start_session_stores_standardized_absolute_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        let session = start_session(Some("t".into()), Some("./sub/../sub/"), &base, &OsFilesystem);
        let event = session.events().last_directory_change().unwrap();

        assert_eq!(event.to_directory(), format!("{}/sub", base));
        assert_eq!(event.from_directory(), None);
        assert_eq!(session.events().len(), 1);
    }

    #[test]
    fn test_start_session_falls_back_to_process_default() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("notes.txt"), "x").unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        for requested in [None, Some(""), Some("missing"), Some("notes.txt")] {
            let session = start_session(None, requested, &format!("{}/", base), &OsFilesystem);
            let event = session.events().last_directory_change().unwrap();
            assert_eq!(event.to_directory(), base);
        }
    }

    #[test]
    fn test_resolve_start_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a/b")).unwrap();
        let base = temp.path().to_string_lossy().into_owned();

        assert_eq!(
            resolve_start_directory(" a//b/. ", &base, &OsFilesystem),
            Some(format!("{}/a/b", base))
        );
        assert_eq!(resolve_start_directory("   ", &base, &OsFilesystem), None);
        assert_eq!(resolve_start_directory("/nonexistent/pine", &base, &OsFilesystem), None);
    }
}
