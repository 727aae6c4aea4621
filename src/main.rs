//! Binary entry point for tir.
//!
//! This binary provides the CLI interface for the tiir reading log.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tiir::cli::{self, FieldsEditor};
use tiir::config::StoreSettings;
use tiir::observability::{self, LoggingConfig};
use tiir::{RenderFormat, TextId, TextService, TirConfig};

/// tir - Today I Read: a log of the articles you read.
#[derive(Parser)]
#[command(name = "tir")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "TIR_CONFIG")]
    config: Option<PathBuf>,

    /// Store to use: file, memory, sqlite or http.
    #[arg(short, long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Log a new text.
    Create {
        /// Title of the text.
        #[arg(long)]
        title: Option<String>,

        /// Where the text can be found.
        #[arg(long)]
        url: Option<String>,

        /// Who wrote it.
        #[arg(long)]
        author: Option<String>,

        /// What you thought of it.
        #[arg(long)]
        note: Option<String>,

        /// Mark the text as public.
        #[arg(long)]
        public: bool,
    },

    /// Print a text.
    Read {
        /// ID of the text.
        id: String,
    },

    /// Change some fields of a text.
    Update {
        /// ID of the text.
        id: String,

        /// New title.
        #[arg(long)]
        title: Option<String>,

        /// New URL.
        #[arg(long)]
        url: Option<String>,

        /// New author.
        #[arg(long)]
        author: Option<String>,

        /// New note.
        #[arg(long)]
        note: Option<String>,
    },

    /// Delete a text.
    Delete {
        /// ID of the text.
        id: String,
    },

    /// List every text, newest first.
    List {
        /// Output format: plain, json or jsonfeed.
        #[arg(short, long, default_value = "plain")]
        format: RenderFormat,
    },
}

fn main() -> ExitCode {
    // A missing .env file is the common case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let overrides = StoreSettings {
        store_type: cli.store.clone(),
        ..StoreSettings::default()
    };
    let config = match TirConfig::load(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return cli::exit_code(&e);
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return cli::exit_code(&e);
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {e}");
            cli::exit_code(&e)
        },
    }
}

/// Runs the selected command against the configured store.
fn run_command(command: Commands, config: &TirConfig) -> tiir::Result<()> {
    let service = TextService::from_config(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match command {
        Commands::Create {
            title,
            url,
            author,
            note,
            public,
        } => cli::cmd_create(
            &service,
            FieldsEditor {
                title,
                url,
                author,
                note,
                public: Some(public),
            },
            &mut out,
        ),
        Commands::Read { id } => cli::cmd_read(&service, &TextId::from(id), &mut out),
        Commands::Update {
            id,
            title,
            url,
            author,
            note,
        } => cli::cmd_update(
            &service,
            &TextId::from(id),
            FieldsEditor {
                title,
                url,
                author,
                note,
                public: None,
            },
            &mut out,
        ),
        Commands::Delete { id } => cli::cmd_delete(&service, &TextId::from(id), &mut out),
        Commands::List { format } => cli::cmd_list(&service, format, &mut out),
    };
    let result = result.and_then(|()| cli::flush_output(&mut out));

    // Report the command's error ahead of any close failure.
    match (result, service.close()) {
        (Err(e), _) | (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(())) => Ok(()),
    }
}
