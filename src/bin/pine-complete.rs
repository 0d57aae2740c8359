// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Scriptable tab completion.
//!
//! Feeds one input through successive tab presses and prints each result on
//! its own line, tab-separated, for use from shell scripts:
//!
//! ```text
//! $ pine-complete --cwd / "/cd /us" --presses 2
//! prefix	/cd /us
//! all	user	usr
//! ```

use clap::Parser;

use pine::completion::{CompletionEngine, CompletionResult};
use pine::session::process_default_directory;

#[derive(Parser)]
#[command(name = "pine-complete")]
#[command(version, about = "Print tab completion results for an input", long_about = None)]
struct Args {
    /// Input field text
    input: String,

    /// Number of tab presses
    #[arg(short = 'n', long, default_value_t = 1)]
    presses: u32,

    /// Base directory for relative paths
    #[arg(long)]
    cwd: Option<String>,
}

fn main() {
    let args = Args::parse();
    let base = args.cwd.unwrap_or_else(process_default_directory);

    let mut engine = CompletionEngine::default();
    let mut text = args.input;
    for _ in 0..args.presses {
        let result = engine.complete(&text, &base);
        println!("{}", render(&result));
        if let Some(replacement) = result.replacement() {
            text = replacement.to_string();
        }
    }
}

fn render(result: &CompletionResult) -> String {
    match result {
        CompletionResult::NoMatches => "none".to_string(),
        CompletionResult::SingleMatch(text) => format!("single\t{}", text),
        CompletionResult::CommonPrefix(text) => format!("prefix\t{}", text),
        CompletionResult::ShowAll(candidates) => format!("all\t{}", candidates.join("\t")),
    }
}
