//! Binary entry point for paradup.
//!
//! This binary provides the CLI interface for paragraph-level duplicate
//! detection.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use paradup::cli;
use paradup::config::ParadupConfig;
use paradup::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Paradup - paragraph-level exact and near-duplicate detection.
#[derive(Parser)]
#[command(name = "paradup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "PARADUP_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Directory holding the corpus database.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Report duplicates of a text without storing it.
    Check {
        /// Text file to check (`-` for stdin).
        file: PathBuf,

        /// Compare only with this owner's texts (default: every stored text).
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Report duplicates of a text, then store it.
    Submit {
        /// Text file to submit (`-` for stdin).
        file: PathBuf,

        /// Owner of the submitted text.
        #[arg(short, long, env = "PARADUP_OWNER")]
        owner: String,
    },

    /// Show a stored text and its duplicate report.
    Show {
        /// Entry identifier.
        id: String,

        /// Owner of the text.
        #[arg(short, long, env = "PARADUP_OWNER")]
        owner: String,
    },

    /// List stored texts, newest first.
    List {
        /// Owner whose texts to list.
        #[arg(short, long, env = "PARADUP_OWNER")]
        owner: String,

        /// Page number (1-based).
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Entries per page.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Recompute a stored text's report against the owner's other texts.
    Rescan {
        /// Entry identifier.
        id: String,

        /// Owner of the text.
        #[arg(short, long, env = "PARADUP_OWNER")]
        owner: String,
    },

    /// Fetch web pages and compare them with every stored text.
    Crawl {
        /// URLs to fetch.
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match ParadupConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }

    let logging = if cli.verbose {
        config.logging.clone().verbose()
    } else {
        config.logging.clone()
    };
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command and returns its output.
fn run_command(command: Commands, config: &ParadupConfig) -> anyhow::Result<String> {
    let output = match command {
        Commands::Check { file, owner } => cli::cmd_check(config, &file, owner.as_deref())
            .with_context(|| format!("checking {}", file.display()))?,

        Commands::Submit { file, owner } => cli::cmd_submit(config, &file, &owner)
            .with_context(|| format!("submitting {}", file.display()))?,

        Commands::Show { id, owner } => cli::cmd_show(config, &id, &owner)?,

        Commands::List { owner, page, limit } => cli::cmd_list(config, &owner, page, limit)?,

        Commands::Rescan { id, owner } => {
            cli::cmd_rescan(config, &id, &owner).with_context(|| format!("rescanning {id}"))?
        },

        Commands::Crawl { urls } => cli::cmd_crawl(config, &urls).context("crawling")?,
    };
    Ok(output)
}
