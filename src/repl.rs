// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Interactive prompt.
//!
//! A small raw-mode line editor: printable keys edit the line, Tab completes,
//! Enter submits. Key handling lives in [`LineBuffer`] so it can be tested
//! without a terminal; [`Repl`] wires it to crossterm, the
//! [`InputController`] and the conversation engine.

use std::io::{self, Write};

use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::warn;

use crate::completion::CompletionResult;
use crate::controller::{InputController, SubmitOutcome};
use crate::conversation::ConversationEngine;
use crate::error::Result;
use crate::session::{EntryRole, Session, SessionEvent, SessionStorage, TranscriptEntry};

/// What a key press did to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// The text changed by typing or deleting.
    Edited,
    /// Tab was pressed.
    Complete,
    /// Enter was pressed; carries the submitted line.
    Submit(String),
    /// Ctrl-C, or Ctrl-D on an empty line.
    Quit,
    Ignored,
}

/// The line being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text with a completion.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => KeyAction::Quit,
            KeyCode::Char('d') if ctrl => {
                if self.text.is_empty() {
                    KeyAction::Quit
                } else {
                    KeyAction::Ignored
                }
            }
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                KeyAction::Edited
            }
            KeyCode::Char(c) if !ctrl => {
                self.text.push(c);
                KeyAction::Edited
            }
            KeyCode::Backspace => {
                if self.text.pop().is_some() {
                    KeyAction::Edited
                } else {
                    KeyAction::Ignored
                }
            }
            KeyCode::Tab => KeyAction::Complete,
            KeyCode::Enter => KeyAction::Submit(std::mem::take(&mut self.text)),
            _ => KeyAction::Ignored,
        }
    }
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "Failed to restore terminal mode");
        }
    }
}

/// Interactive session loop.
pub struct Repl<C: ConversationEngine> {
    controller: InputController,
    session: Session,
    storage: Option<SessionStorage>,
    conversation: C,
}

impl<C: ConversationEngine> Repl<C> {
    pub fn new(
        controller: InputController,
        session: Session,
        storage: Option<SessionStorage>,
        conversation: C,
    ) -> Self {
        Self {
            controller,
            session,
            storage,
            conversation,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run until `/exit`, Ctrl-C or Ctrl-D.
    pub async fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            self.session.display_title().bold(),
            format!("({})", self.session.id).dimmed()
        );
        println!("{}", "Type /help for commands, Tab to complete.".dimmed());

        let mut line = LineBuffer::new();
        loop {
            let submitted = {
                let _raw = RawModeGuard::enable()?;
                self.draw_prompt(&line)?;
                self.read_line(&mut line)?
            };
            println!();

            let Some(input) = submitted else {
                break;
            };
            if !self.handle_submit(&input).await? {
                break;
            }
        }
        Ok(())
    }

    /// Read keys until the line is submitted; `None` means quit.
    fn read_line(&mut self, line: &mut LineBuffer) -> Result<Option<String>> {
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match line.handle_key(key) {
                KeyAction::Edited => {
                    self.controller.on_edit();
                    self.draw_prompt(line)?;
                }
                KeyAction::Complete => {
                    match self.controller.on_tab(line.text(), &self.session) {
                        CompletionResult::SingleMatch(text) | CompletionResult::CommonPrefix(text) => {
                            line.set(text);
                        }
                        CompletionResult::ShowAll(candidates) => {
                            print!("\r\n{}\r\n", candidates.join("  ").cyan());
                        }
                        CompletionResult::NoMatches => {
                            print!("\x07");
                        }
                    }
                    self.draw_prompt(line)?;
                }
                KeyAction::Submit(text) => return Ok(Some(text)),
                KeyAction::Quit => return Ok(None),
                KeyAction::Ignored => {}
            }
        }
    }

    fn draw_prompt(&self, line: &LineBuffer) -> Result<()> {
        let cwd = self.controller.working_directory(&self.session);
        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine)
        )?;
        write!(stdout, "{} {} {}", cwd.blue(), ">".green().bold(), line.text())?;
        stdout.flush()?;
        Ok(())
    }

    /// Handle a submitted line; `false` ends the loop.
    async fn handle_submit(&mut self, input: &str) -> Result<bool> {
        match self.controller.submit(input, &mut self.session) {
            SubmitOutcome::DirectoryChanged(event) => {
                println!("{}", event.describe().dimmed());
                self.persist_event(SessionEvent::from(event));
            }
            SubmitOutcome::Declined(reason) => println!("{}", reason.red()),
            SubmitOutcome::Command(output) => println!("{}", output.trim_end()),
            SubmitOutcome::Message(text) => {
                let cwd = self.controller.working_directory(&self.session);
                let entries = self.conversation.send(&mut self.session, &text, &cwd).await?;
                for entry in &entries {
                    print_entry(entry);
                }
                self.persist_entries(&entries);
            }
            SubmitOutcome::Exit => return Ok(false),
            SubmitOutcome::Empty => {}
        }
        Ok(true)
    }

    fn persist_event(&self, event: SessionEvent) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.append_event(&self.session.id, &event) {
                warn!(error = %e, "Failed to save event");
            }
        }
    }

    fn persist_entries(&self, entries: &[TranscriptEntry]) {
        if let Some(storage) = &self.storage {
            for entry in entries {
                if let Err(e) = storage.append_entry(&self.session.id, entry) {
                    warn!(error = %e, "Failed to save transcript entry");
                }
            }
        }
    }
}

fn print_entry(entry: &TranscriptEntry) {
    match entry.role {
        EntryRole::User | EntryRole::ToolCall => {}
        EntryRole::Assistant => println!("{}", entry.content.italic()),
        EntryRole::ToolOutput => println!("{}", entry.content.trim_end()),
    }
}
