// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pine main entry point - CLI, subcommands, and REPL.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use pine::commands;
use pine::completion::OsFilesystem;
use pine::config::{self, CliOptions, ResolvedConfig};
use pine::controller::InputController;
use pine::conversation::ShellConversation;
use pine::repl::Repl;
use pine::session::{
    process_default_directory, DisplayEntry, EntryRole, Session, SessionStorage,
};
use pine::telemetry::{init_telemetry, TelemetryConfig};

/// Pine version string.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pine - a chat prompt that knows where it is.
#[derive(Parser)]
#[command(name = "pine")]
#[command(author, version, about = "Chat prompt with a shell-like working directory", long_about = None)]
struct Cli {
    /// Session to resume
    #[arg(short, long, env = "PINE_SESSION")]
    session: Option<String>,

    /// Initial working directory for new sessions
    #[arg(short = 'C', long, env = "PINE_WORKING_DIRECTORY")]
    working_directory: Option<String>,

    /// Session database path
    #[arg(long, env = "PINE_DB")]
    db: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "PINE_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stored sessions
    Sessions {
        #[command(subcommand)]
        action: Option<SessionsAction>,
    },
    /// Show or create configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SessionsAction {
    /// List sessions, newest first
    List,
    /// Create an empty session
    New {
        /// Session title
        title: Option<String>,
    },
    /// Delete a session
    Delete { id: String },
    /// Print a session's conversation
    Show { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the merged configuration
    Show,
    /// Write an example .pine.json to the current directory
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut telemetry = if cli.debug {
        TelemetryConfig::development()
    } else {
        TelemetryConfig::default()
    };
    if let Some(path) = &cli.log_file {
        telemetry = telemetry.with_log_file(path);
    }
    let _guard = init_telemetry(&telemetry).context("Failed to initialize logging")?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let workspace_root = config::find_workspace_root(&cwd).unwrap_or(cwd);
    let config = config::load_config(
        &workspace_root,
        CliOptions {
            working_directory: cli.working_directory.clone(),
            session_database: cli.db.clone(),
        },
    )?;

    match cli.command {
        Some(command) => handle_command(command, &config, &workspace_root),
        None => run_repl(&config, cli.session.as_deref()).await,
    }
}

fn handle_command(command: Commands, config: &ResolvedConfig, workspace_root: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Sessions { action } => {
            let mut storage = open_storage(config)?;
            match action {
                Some(SessionsAction::List) | None => {
                    let sessions = storage.list_sessions()?;
                    if sessions.is_empty() {
                        println!("{}", "No sessions yet.".dimmed());
                    }
                    for info in sessions {
                        println!("{}", info.format());
                    }
                }
                Some(SessionsAction::New { title }) => {
                    let session = new_session(config, title);
                    storage.create_session(&session)?;
                    println!("Created session: {}", session.id.bright_white());
                }
                Some(SessionsAction::Delete { id }) => {
                    if storage.delete_session(&id)? {
                        println!("Deleted session: {}", id);
                    } else {
                        println!("{}", format!("Session not found: {}", id).red());
                    }
                }
                Some(SessionsAction::Show { id }) => {
                    let session = storage
                        .get_session(&id)?
                        .with_context(|| format!("Session not found: {}", id))?;
                    print_session(&session);
                }
            }
        }
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            Some(ConfigAction::Init) => {
                let path = config::init_config(workspace_root, None)?;
                println!("Created config file: {}", path.display());
            }
        },
        Commands::Version => {
            println!("pine {}", VERSION);
        }
    }
    Ok(())
}

async fn run_repl(config: &ResolvedConfig, session_id: Option<&str>) -> anyhow::Result<()> {
    let mut storage = open_storage(config)?;
    let session = match session_id {
        Some(id) => storage
            .get_session(id)?
            .with_context(|| format!("Session not found: {}", id))?,
        None => {
            let session = new_session(config, None);
            storage.create_session(&session)?;
            session
        }
    };

    let process_default = process_default_directory();
    let configured = config
        .working_directory()
        .and_then(|dir| commands::resolve_start_directory(dir, &process_default, &OsFilesystem));
    let controller = InputController::with_os_filesystem(configured, process_default);
    let conversation = ShellConversation::new(config.enabled_tools.clone());

    Repl::new(controller, session, Some(storage), conversation)
        .run()
        .await
}

fn open_storage(config: &ResolvedConfig) -> anyhow::Result<SessionStorage> {
    let storage = match &config.session_database {
        Some(path) => SessionStorage::open_at(&PathBuf::from(path))?,
        None => SessionStorage::open()?,
    };
    Ok(storage)
}

/// New session starting in the configured directory when it exists.
fn new_session(config: &ResolvedConfig, title: Option<String>) -> Session {
    commands::start_session(
        title,
        config.working_directory(),
        &process_default_directory(),
        &OsFilesystem,
    )
}

fn print_session(session: &Session) {
    println!(
        "{} {}",
        session.display_title().bold(),
        format!("({})", session.id).dimmed()
    );
    for entry in session.display_entries() {
        match entry {
            DisplayEntry::Event(event) => println!("{}", format!("-- {}", event.describe()).dimmed()),
            DisplayEntry::Transcript(entry) => match entry.role {
                EntryRole::User => println!("{} {}", ">".green().bold(), entry.content),
                EntryRole::Assistant => println!("{}", entry.content.italic()),
                EntryRole::ToolCall => println!("{}", entry.content.cyan()),
                EntryRole::ToolOutput => println!("{}", entry.content.trim_end()),
            },
        }
    }
}
