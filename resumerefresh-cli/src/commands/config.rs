//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use resumerefresh_store::{config, default_config_path};
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the config file path.
    Path,

    /// Show the effective configuration (passwords redacted).
    Show,

    /// Write a starter config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Path => show_path(cli),
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Init { force } => init_config(*force, cli).await,
    }
}

fn show_path(cli: &Cli) -> Result<()> {
    let path = cli
        .config_path()
        .map_or_else(default_config_path, std::path::Path::to_path_buf);

    match cli.format {
        OutputFormat::Text => println!("{}", path.display()),
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_file": path.display().to_string(),
                "exists": path.exists(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn show_config(cli: &Cli) -> Result<()> {
    let loaded = config::load(cli.config_path()).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());
            println!("{}", formatter.format_config(&loaded));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_config(&loaded)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = cli
        .config_path()
        .map_or_else(default_config_path, std::path::Path::to_path_buf);

    config::init(&path, force).await?;

    info!(path = %path.display(), "Config template written");
    println!("Wrote {}", path.display());
    println!("Fill in the resume section and the credentials of the providers you use.");

    Ok(())
}
