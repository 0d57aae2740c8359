// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The multi-press completion state machine.
//!
//! Successive tab presses on the same input progressively narrow: a single
//! candidate completes at once, several candidates first complete to their
//! common prefix, and the next press (or the first, when nothing is shared)
//! discloses the whole list.

use std::sync::Arc;
#[cfg(feature = "telemetry")]
use std::time::Instant;

use tracing::debug;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::{record_completion, GLOBAL_METRICS};
use crate::telemetry::CompletionOutcome;

use super::candidates::{CandidateSource, Filesystem, OsFilesystem};
use super::strategy::{default_strategies, CompletionForm, CompletionStrategy};

/// Outcome of one tab press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Nothing claims the input, or there is nothing to offer.
    NoMatches,
    /// Exactly one candidate: replace the input with this text.
    SingleMatch(String),
    /// Several candidates sharing a prefix: replace the input with this text.
    CommonPrefix(String),
    /// Disclose every candidate for manual selection.
    ShowAll(Vec<String>),
}

impl CompletionResult {
    /// Replacement text for the input field, if this result carries one.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::SingleMatch(text) | Self::CommonPrefix(text) => Some(text),
            Self::NoMatches | Self::ShowAll(_) => None,
        }
    }

    pub fn outcome(&self) -> CompletionOutcome {
        match self {
            Self::NoMatches => CompletionOutcome::NoMatches,
            Self::SingleMatch(_) => CompletionOutcome::SingleMatch,
            Self::CommonPrefix(_) => CompletionOutcome::CommonPrefix,
            Self::ShowAll(_) => CompletionOutcome::ShowAll,
        }
    }
}

/// Per-input-field completion state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionState {
    last_input: String,
    candidates: Vec<String>,
    tab_press_count: u32,
}

impl CompletionState {
    /// The input the current candidates were computed for.
    pub fn last_input(&self) -> &str {
        &self.last_input
    }

    /// Candidates for [`last_input`](Self::last_input), sorted case-insensitively.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Tab presses on the same input since the candidates were computed.
    pub fn tab_press_count(&self) -> u32 {
        self.tab_press_count
    }

    fn clear(&mut self) {
        self.last_input.clear();
        self.candidates.clear();
        self.tab_press_count = 0;
    }
}

/// Coordinates strategies and applies the multi-press policy.
///
/// Each input surface owns its own engine; the state is never shared.
pub struct CompletionEngine {
    strategies: Vec<Box<dyn CompletionStrategy>>,
    state: CompletionState,
}

impl CompletionEngine {
    /// Engine with the default strategies, listing through `fs`.
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self::with_strategies(default_strategies(CandidateSource::new(fs)))
    }

    /// Engine with an explicit, already ordered strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn CompletionStrategy>>) -> Self {
        Self {
            strategies,
            state: CompletionState::default(),
        }
    }

    /// Current state, for display and tests.
    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    /// Handle one tab press on `input`, resolving paths against `base_directory`.
    pub fn complete(&mut self, input: &str, base_directory: &str) -> CompletionResult {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let result = self.complete_inner(input, base_directory);

        #[cfg(feature = "telemetry")]
        {
            GLOBAL_METRICS.record_operation("completion.complete", start.elapsed());
            record_completion(result.outcome());
        }

        debug!(
            input,
            presses = self.state.tab_press_count,
            candidates = self.state.candidates.len(),
            outcome = ?result.outcome(),
            "Tab completion"
        );
        result
    }

    fn complete_inner(&mut self, input: &str, base_directory: &str) -> CompletionResult {
        let Some(strategy) = self.strategies.iter().find(|s| s.can_handle(input)) else {
            return CompletionResult::NoMatches;
        };

        if input != self.state.last_input {
            self.state.candidates = strategy.candidates(input, base_directory);
            self.state.last_input = input.to_string();
            self.state.tab_press_count = 0;
            debug!(strategy = strategy.name(), "Recomputed candidates");
        }

        if self.state.candidates.is_empty() {
            return CompletionResult::NoMatches;
        }

        self.state.tab_press_count += 1;

        if let [only] = self.state.candidates.as_slice() {
            return CompletionResult::SingleMatch(strategy.build_text(
                input,
                only,
                base_directory,
                CompletionForm::Full,
            ));
        }

        if self.state.tab_press_count == 1 {
            if let Some(prefix) = find_common_prefix(&self.state.candidates) {
                return CompletionResult::CommonPrefix(strategy.build_text(
                    input,
                    &prefix,
                    base_directory,
                    CompletionForm::Partial,
                ));
            }
        }

        CompletionResult::ShowAll(self.state.candidates.clone())
    }

    /// Full completion text for a candidate picked from a disclosed list.
    ///
    /// Resets the state, since the input is about to change. Returns `None` when
    /// no strategy claims `input`.
    pub fn accept(&mut self, input: &str, candidate: &str, base_directory: &str) -> Option<String> {
        let text = self
            .strategies
            .iter()
            .find(|s| s.can_handle(input))
            .map(|s| s.build_text(input, candidate, base_directory, CompletionForm::Full));
        self.reset();
        text
    }

    /// Forget everything; call on any edit that is not a completion.
    pub fn reset(&mut self) {
        self.state.clear();
    }
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(Arc::new(OsFilesystem))
    }
}

/// Longest prefix shared by every candidate, compared byte for byte.
///
/// Returns `None` for an empty list or when the candidates share nothing.
/// Candidates that differ only in case share less than one might expect
/// (`"Docs"` and `"docs"` share nothing); that matches shell behavior.
pub fn find_common_prefix(candidates: &[String]) -> Option<String> {
    let (first, rest) = candidates.split_first()?;
    let mut prefix = first.clone();

    for candidate in rest {
        while !candidate.starts_with(prefix.as_str()) {
            prefix.pop();
        }
        if prefix.is_empty() {
            return None;
        }
    }

    (!prefix.is_empty()).then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::candidates::{DirectoryEntry, MockFilesystem};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn engine_with_root(dirs: &'static [&'static str]) -> CompletionEngine {
        let mut fs = MockFilesystem::new();
        fs.expect_list_directory()
            .returning(move |_| Ok(dirs.iter().map(|d| DirectoryEntry::directory(*d)).collect()));
        CompletionEngine::new(Arc::new(fs))
    }

    #[test]
    fn test_find_common_prefix() {
        assert_eq!(
            find_common_prefix(&strings(&["foo", "foobar", "foobaz"])),
            Some("foo".to_string())
        );
        assert_eq!(find_common_prefix(&strings(&["abc", "xyz"])), None);
        assert_eq!(
            find_common_prefix(&strings(&["usr", "user"])),
            Some("us".to_string())
        );
        assert_eq!(find_common_prefix(&strings(&["only"])), Some("only".to_string()));
        assert_eq!(find_common_prefix(&[]), None);
    }

    #[test]
    fn test_common_prefix_is_case_sensitive() {
        assert_eq!(find_common_prefix(&strings(&["Docs", "docs"])), None);
        assert_eq!(
            find_common_prefix(&strings(&["Desktop", "Documents", "downloads"])),
            None
        );
        assert_eq!(
            find_common_prefix(&strings(&["Documents", "Downloads"])),
            Some("Do".to_string())
        );
    }

    #[test]
    fn test_common_prefix_respects_char_boundaries() {
        assert_eq!(
            find_common_prefix(&strings(&["café", "cafè"])),
            Some("caf".to_string())
        );
    }

    #[test]
    fn test_no_strategy_leaves_state_untouched() {
        let mut engine = engine_with_root(&["usr", "user"]);
        engine.complete("/cd /us", "/");
        let before = engine.state().clone();

        assert_eq!(engine.complete("plain text", "/"), CompletionResult::NoMatches);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_single_match_every_press() {
        let mut engine = engine_with_root(&["usr"]);
        for press in 1..=3 {
            assert_eq!(
                engine.complete("/cd /us", "/"),
                CompletionResult::SingleMatch("/cd /usr/".to_string())
            );
            assert_eq!(engine.state().tab_press_count(), press);
        }
    }

    #[test]
    fn test_common_prefix_then_show_all() {
        let mut engine = engine_with_root(&["usr", "user"]);

        assert_eq!(
            engine.complete("/cd /us", "/"),
            CompletionResult::CommonPrefix("/cd /us".to_string())
        );
        assert_eq!(
            engine.complete("/cd /us", "/"),
            CompletionResult::ShowAll(strings(&["user", "usr"]))
        );
        assert_eq!(
            engine.complete("/cd /us", "/"),
            CompletionResult::ShowAll(strings(&["user", "usr"]))
        );
    }

    #[test]
    fn test_no_shared_prefix_shows_all_at_once() {
        let mut engine = engine_with_root(&["bin", "etc", "usr"]);

        assert_eq!(
            engine.complete("/cd /", "/"),
            CompletionResult::ShowAll(strings(&["bin", "etc", "usr"]))
        );
        assert_eq!(
            engine.complete("/cd /", "/"),
            CompletionResult::ShowAll(strings(&["bin", "etc", "usr"]))
        );
    }

    #[test]
    fn test_changed_input_recomputes() {
        let mut engine = engine_with_root(&["usr", "user"]);
        engine.complete("/cd /us", "/");
        engine.complete("/cd /us", "/");
        assert_eq!(engine.state().tab_press_count(), 2);

        let result = engine.complete("/cd /use", "/");
        assert_eq!(engine.state().last_input(), "/cd /use");
        assert_eq!(engine.state().tab_press_count(), 1);
        assert_eq!(result, CompletionResult::SingleMatch("/cd /user/".to_string()));
    }

    #[test]
    fn test_empty_candidates_do_not_count_presses() {
        let mut engine = engine_with_root(&[]);
        assert_eq!(engine.complete("/cd /zz", "/"), CompletionResult::NoMatches);
        assert_eq!(engine.complete("/cd /zz", "/"), CompletionResult::NoMatches);
        assert_eq!(engine.state().tab_press_count(), 0);
        assert_eq!(engine.state().last_input(), "/cd /zz");
    }

    #[test]
    fn test_command_name_completion() {
        let mut engine = engine_with_root(&[]);
        assert_eq!(
            engine.complete("/c", "/"),
            CompletionResult::SingleMatch("/cd ".to_string())
        );
    }

    #[test]
    fn test_reset_clears_state() {
        let mut engine = engine_with_root(&["usr", "user"]);
        engine.complete("/cd /us", "/");
        engine.reset();

        assert_eq!(engine.state(), &CompletionState::default());
        // Same input again starts over at the common-prefix stage
        assert!(matches!(
            engine.complete("/cd /us", "/"),
            CompletionResult::CommonPrefix(_)
        ));
    }

    #[test]
    fn test_accept_builds_full_text_and_resets() {
        let mut engine = engine_with_root(&["usr", "user"]);
        engine.complete("/cd /us", "/");
        engine.complete("/cd /us", "/");

        assert_eq!(
            engine.accept("/cd /us", "user", "/"),
            Some("/cd /user/".to_string())
        );
        assert_eq!(engine.state().tab_press_count(), 0);
        assert_eq!(engine.accept("hello", "x", "/"), None);
    }

    #[test]
    fn test_result_replacement() {
        assert_eq!(
            CompletionResult::SingleMatch("/cd /a/".into()).replacement(),
            Some("/cd /a/")
        );
        assert_eq!(CompletionResult::ShowAll(vec![]).replacement(), None);
        assert_eq!(
            CompletionResult::CommonPrefix("x".into()).outcome(),
            CompletionOutcome::CommonPrefix
        );
    }
}
