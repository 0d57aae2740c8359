// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Completion strategies.
//!
//! A strategy claims a class of input, proposes candidates for it and knows how
//! to rewrite the input once a candidate (or a shared prefix of candidates) is
//! chosen. The set of strategies is closed and ordered; see
//! [`default_strategies`].

use crate::commands::{ArgumentKind, COMMANDS};

use super::candidates::{sort_case_insensitive, CandidateSource};
use super::path;

/// Which kind of replacement text to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionForm {
    /// A complete candidate: the text is ready for the next argument or path
    /// segment.
    Full,
    /// A shared prefix of several candidates: the user keeps typing.
    Partial,
}

/// Trait implemented by every completion strategy.
pub trait CompletionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this strategy owns `input`.
    fn can_handle(&self, input: &str) -> bool;

    /// Ordered candidates for `input`, resolved against `base_directory`.
    fn candidates(&self, input: &str, base_directory: &str) -> Vec<String>;

    /// Full replacement text for the input field once `candidate` is chosen.
    fn build_text(
        &self,
        input: &str,
        candidate: &str,
        base_directory: &str,
        form: CompletionForm,
    ) -> String;
}

/// Completes the directory argument of a path-taking command such as `/cd`.
pub struct DirectoryPathStrategy {
    command: &'static str,
    trigger: String,
    source: CandidateSource,
}

impl DirectoryPathStrategy {
    /// Strategy for `command` (with its leading `/`), listing through `source`.
    pub fn new(command: &'static str, source: CandidateSource) -> Self {
        Self {
            command,
            trigger: format!("{} ", command),
            source,
        }
    }

    /// The command this strategy completes arguments for.
    pub fn command(&self) -> &'static str {
        self.command
    }

    /// Everything after the trigger, leading spaces included.
    fn fragment<'a>(&self, input: &'a str) -> &'a str {
        input.strip_prefix(self.trigger.as_str()).unwrap_or("")
    }
}

impl CompletionStrategy for DirectoryPathStrategy {
    fn name(&self) -> &'static str {
        "directory_path"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with(self.trigger.as_str())
    }

    fn candidates(&self, input: &str, base_directory: &str) -> Vec<String> {
        if !self.can_handle(input) {
            return Vec::new();
        }
        let expanded = path::expand(self.fragment(input), base_directory);
        let (directory, prefix) = path::split(&expanded);
        self.source.list(&directory, &prefix)
    }

    fn build_text(
        &self,
        input: &str,
        candidate: &str,
        base_directory: &str,
        form: CompletionForm,
    ) -> String {
        if !self.can_handle(input) {
            return input.to_string();
        }
        let expanded = path::expand(self.fragment(input), base_directory);
        let (directory, _) = path::split(&expanded);
        let mut completed = path::standardize(&path::join(&directory, candidate));

        if form == CompletionForm::Full && !completed.ends_with(path::SEPARATOR) {
            completed.push(path::SEPARATOR);
        }

        format!("{}{}", self.trigger, completed)
    }
}

/// Completes slash-command names from the fixed registry.
pub struct CommandStrategy {
    commands: Vec<&'static str>,
}

impl CommandStrategy {
    pub fn new(commands: Vec<&'static str>) -> Self {
        Self { commands }
    }
}

impl Default for CommandStrategy {
    fn default() -> Self {
        Self::new(COMMANDS.iter().map(|c| c.name).collect())
    }
}

impl CompletionStrategy for CommandStrategy {
    fn name(&self) -> &'static str {
        "command"
    }

    /// A `/` followed by a command name that has not been terminated by a space.
    fn can_handle(&self, input: &str) -> bool {
        input.starts_with('/') && !input.contains(char::is_whitespace)
    }

    fn candidates(&self, input: &str, _base_directory: &str) -> Vec<String> {
        let Some(prefix) = input.strip_prefix('/') else {
            return Vec::new();
        };
        let prefix = prefix.to_lowercase();

        let mut matches: Vec<String> = self
            .commands
            .iter()
            .filter(|command| {
                command
                    .trim_start_matches('/')
                    .to_lowercase()
                    .starts_with(&prefix)
            })
            .map(|command| command.to_string())
            .collect();

        sort_case_insensitive(&mut matches);
        matches
    }

    fn build_text(
        &self,
        _input: &str,
        candidate: &str,
        _base_directory: &str,
        form: CompletionForm,
    ) -> String {
        match form {
            CompletionForm::Full => format!("{} ", candidate),
            CompletionForm::Partial => candidate.to_string(),
        }
    }
}

/// The fixed, priority-ordered strategy list.
///
/// Every path-taking command gets a [`DirectoryPathStrategy`], and all of them
/// come before the [`CommandStrategy`]: once `/cd ` is typed the input belongs
/// to the path completer and must not be read as an unfinished command name.
pub fn default_strategies(source: CandidateSource) -> Vec<Box<dyn CompletionStrategy>> {
    let mut strategies: Vec<Box<dyn CompletionStrategy>> = COMMANDS
        .iter()
        .filter(|command| command.argument == ArgumentKind::DirectoryPath)
        .map(|command| {
            Box::new(DirectoryPathStrategy::new(command.name, source.clone()))
                as Box<dyn CompletionStrategy>
        })
        .collect();

    strategies.push(Box::new(CommandStrategy::default()));
    strategies
}
