// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `ResumeRefresh` CLI - re-upload your resume to job portals.
//!
//! # Examples
//!
//! ```bash
//! # Refresh every provider that has credentials
//! resume-refresh
//!
//! # Only some providers
//! resume-refresh --provider naukri,monster
//!
//! # JSON report
//! resume-refresh --format json --pretty
//!
//! # List providers and whether they will run
//! resume-refresh providers
//!
//! # Write a starter config file
//! resume-refresh config init
//! ```

mod commands;
mod output;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use resumerefresh_core::RefreshError;
use resumerefresh_fetch::RunError;
use resumerefresh_store::StoreError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, providers, run};

/// Set to any non-empty value to enable debug logging.
const DEBUG_ENV: &str = "APP_DEBUG";

// ============================================================================
// CLI Definition
// ============================================================================

/// `ResumeRefresh` CLI - keep your resume fresh on job portals.
#[derive(Parser)]
#[command(name = "resume-refresh")]
#[command(about = "Re-upload your resume to job portals")]
#[command(long_about = r#"
ResumeRefresh logs in to each job portal you have credentials for and
uploads your resume again, so recruiters see a recently updated profile.

Supported providers (run order):
  • Instahyre (instahyre)
  • Naukri (naukri)
  • Monster (monster)

Credentials come from the config file or APP_<PROVIDER>_USERNAME and
APP_<PROVIDER>_PASSWORD. The resume comes from APP_RESUME_PATH and
APP_RESUME_FILENAME.

Examples:
  resume-refresh                      # Every provider with credentials
  resume-refresh --provider naukri    # Single provider
  resume-refresh --format json        # JSON report
  resume-refresh config init          # Write a starter config
"#)]
#[command(version)]
#[command(author = "ResumeRefresh Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'run' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to the platform config directory).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Providers to run, comma-separated: "naukri,monster" (or "all").
    #[arg(long, short, global = true)]
    pub provider: Option<String>,

    /// Verbose output (debug logging).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Explicit config path, if one was given.
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Provider names from `--provider`; `None` means every provider.
    pub fn provider_filter(&self) -> Option<Vec<String>> {
        let raw = self.provider.as_deref()?.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            return None;
        }
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether text output should be colored.
    pub fn use_colors(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the resume on every enabled provider (default).
    #[command(visible_alias = "r")]
    Run,

    /// List providers, their priority and whether they will run.
    #[command(visible_alias = "p")]
    Providers,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every provider succeeded.
    Success = 0,
    /// At least one provider failed, or an unexpected error.
    Failure = 1,
    /// Nothing ran: missing or invalid configuration.
    Configuration = 2,
}

impl ExitCode {
    /// Classifies an error that aborted a command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        let configuration = err.chain().any(|cause| {
            cause.is::<StoreError>()
                || cause
                    .downcast_ref::<RefreshError>()
                    .is_some_and(RefreshError::is_configuration)
                || cause
                    .downcast_ref::<RunError>()
                    .is_some_and(RunError::is_configuration)
        });
        if configuration {
            Self::Configuration
        } else {
            Self::Failure
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn log_filter(verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let debug = verbose || std::env::var_os(DEBUG_ENV).is_some_and(|v| !v.is_empty());
    if debug {
        EnvFilter::new("resumerefresh=debug,warn")
    } else {
        EnvFilter::new("resumerefresh=info,warn")
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Run) | None => run::run(&cli).await,
        Some(Commands::Providers) => providers::run(&cli).await.map(|()| ExitCode::Success),
        Some(Commands::Config(args)) => config::run(args, &cli).await.map(|()| ExitCode::Success),
    };

    let code = result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        ExitCode::for_error(&e)
    });

    std::process::exit(code as i32);
}
