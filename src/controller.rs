// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Input-field controller.
//!
//! One controller per input surface. It owns that surface's completion state,
//! derives the base directory for every tab press, and turns submitted text
//! into a [`SubmitOutcome`]. A successful `/cd` is recorded as an event on the
//! session; nothing here holds a current directory of its own.

use std::sync::Arc;

use tracing::debug;

use crate::commands::{self, CD, EXIT, HELP, METRICS, PWD};
use crate::completion::{CompletionEngine, CompletionResult, Filesystem, OsFilesystem};
use crate::session::{DirectoryChangeEvent, Session, WorkingDirectoryResolver};
use crate::telemetry::GLOBAL_METRICS;

/// What submitting the input field produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// `/cd` succeeded and this event was appended.
    DirectoryChanged(DirectoryChangeEvent),
    /// A command was refused; the text says why. Nothing was recorded.
    Declined(String),
    /// Output of an informational command.
    Command(String),
    /// Plain text for the conversation engine.
    Message(String),
    /// The user asked to leave.
    Exit,
    /// Blank input.
    Empty,
}

/// Drives completion and submission for one input field.
pub struct InputController {
    engine: CompletionEngine,
    resolver: WorkingDirectoryResolver,
    fs: Arc<dyn Filesystem>,
    configured_directory: Option<String>,
    process_default: String,
}

impl InputController {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        configured_directory: Option<String>,
        process_default: impl Into<String>,
    ) -> Self {
        Self {
            engine: CompletionEngine::new(fs.clone()),
            resolver: WorkingDirectoryResolver::new(fs.clone()),
            fs,
            configured_directory,
            process_default: process_default.into(),
        }
    }

    /// Controller on the real filesystem.
    pub fn with_os_filesystem(
        configured_directory: Option<String>,
        process_default: impl Into<String>,
    ) -> Self {
        Self::new(Arc::new(OsFilesystem), configured_directory, process_default)
    }

    pub fn engine(&self) -> &CompletionEngine {
        &self.engine
    }

    /// The session's working directory right now.
    pub fn working_directory(&self, session: &Session) -> String {
        self.resolver.resolve(
            session.events(),
            self.configured_directory.as_deref(),
            &self.process_default,
        )
    }

    /// Any edit that is not a completion.
    pub fn on_edit(&mut self) {
        self.engine.reset();
    }

    /// A tab press on `input`.
    pub fn on_tab(&mut self, input: &str, session: &Session) -> CompletionResult {
        let base = self.working_directory(session);
        self.engine.complete(input, &base)
    }

    /// Completion text for a candidate chosen from a disclosed list.
    pub fn select_candidate(&mut self, input: &str, candidate: &str, session: &Session) -> Option<String> {
        let base = self.working_directory(session);
        self.engine.accept(input, candidate, &base)
    }

    /// Handle the submitted input field.
    pub fn submit(&mut self, input: &str, session: &mut Session) -> SubmitOutcome {
        self.engine.reset();

        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }

        let Some((name, args)) = commands::parse(text) else {
            return SubmitOutcome::Message(text.to_string());
        };
        let Some(command) = commands::find(name) else {
            return SubmitOutcome::Declined(format!(
                "Unknown command: {} (try {})",
                name, HELP
            ));
        };

        debug!(command = command.name, "Submitting command");
        match command.name {
            CD => {
                let base = self.working_directory(session);
                match commands::change_directory(session, args, &base, self.fs.as_ref()) {
                    Ok(event) => SubmitOutcome::DirectoryChanged(event),
                    Err(e) => SubmitOutcome::Declined(e.to_string()),
                }
            }
            PWD => SubmitOutcome::Command(self.working_directory(session)),
            HELP => SubmitOutcome::Command(commands::help_text()),
            METRICS => SubmitOutcome::Command(GLOBAL_METRICS.snapshot().format_report()),
            EXIT => SubmitOutcome::Exit,
            other => SubmitOutcome::Declined(format!("Command not available: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(dirs: &[&str]) -> (TempDir, String) {
        let temp = TempDir::new().unwrap();
        for dir in dirs {
            std::fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        let root = temp.path().to_string_lossy().into_owned();
        (temp, root)
    }

    #[test]
    fn test_tab_uses_derived_directory() {
        let (_temp, root) = fixture(&["alpha/inner", "beta"]);
        let mut controller = InputController::with_os_filesystem(None, "/");
        let mut session = Session::starting_in(None, root.clone());

        assert_eq!(
            controller.on_tab("/cd al", &session),
            CompletionResult::SingleMatch(format!("/cd {}/alpha/", root))
        );

        let outcome = controller.submit("/cd alpha", &mut session);
        assert!(matches!(outcome, SubmitOutcome::DirectoryChanged(_)));
        assert_eq!(
            controller.on_tab("/cd i", &session),
            CompletionResult::SingleMatch(format!("/cd {}/alpha/inner/", root))
        );
    }

    #[test]
    fn test_edit_resets_press_count() {
        let (_temp, root) = fixture(&["usr", "user"]);
        let mut controller = InputController::with_os_filesystem(Some(root.clone()), "/");
        let session = Session::new(None);

        let input = format!("/cd {}/us", root);
        assert!(matches!(
            controller.on_tab(&input, &session),
            CompletionResult::CommonPrefix(_)
        ));
        controller.on_edit();
        assert_eq!(controller.engine().state().tab_press_count(), 0);
        assert!(matches!(
            controller.on_tab(&input, &session),
            CompletionResult::CommonPrefix(_)
        ));
    }

    #[test]
    fn test_select_candidate() {
        let (_temp, root) = fixture(&["usr", "user"]);
        let mut controller = InputController::with_os_filesystem(Some(root.clone()), "/");
        let session = Session::new(None);

        let text = controller.select_candidate("/cd us", "user", &session);
        assert_eq!(text, Some(format!("/cd {}/user/", root)));
        assert_eq!(controller.engine().state().tab_press_count(), 0);
    }

    #[test]
    fn test_declined_cd_changes_nothing() {
        let (_temp, root) = fixture(&[]);
        let mut controller = InputController::with_os_filesystem(None, "/");
        let mut session = Session::starting_in(None, root.clone());

        let outcome = controller.submit("/cd /nonexistent/pine", &mut session);
        assert_eq!(
            outcome,
            SubmitOutcome::Declined("Directory does not exist: /nonexistent/pine".into())
        );
        assert_eq!(session.events().len(), 1);
        assert_eq!(controller.working_directory(&session), root);
    }

    #[test]
    fn test_other_submissions() {
        let mut controller = InputController::with_os_filesystem(None, "/");
        let mut session = Session::new(None);

        assert_eq!(controller.submit("   ", &mut session), SubmitOutcome::Empty);
        assert_eq!(
            controller.submit(" hello ", &mut session),
            SubmitOutcome::Message("hello".into())
        );
        assert_eq!(controller.submit("/exit", &mut session), SubmitOutcome::Exit);
        assert!(matches!(
            controller.submit("/EXIT", &mut session),
            SubmitOutcome::Declined(reason) if reason.starts_with("Unknown command: /EXIT")
        ));
        assert_eq!(
            controller.submit("/pwd", &mut session),
            SubmitOutcome::Command("/".into())
        );
        assert!(matches!(
            controller.submit("/help", &mut session),
            SubmitOutcome::Command(text) if text.contains("/cd [path]")
        ));
        assert!(matches!(
            controller.submit("/bogus", &mut session),
            SubmitOutcome::Declined(text) if text.starts_with("Unknown command: /bogus")
        ));
        assert!(session.events().is_empty());
    }
}
