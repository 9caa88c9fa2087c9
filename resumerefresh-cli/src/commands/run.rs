//! Run command - refresh the resume on every enabled provider.

use anyhow::{Context, Result};
use resumerefresh_core::RunReport;
use resumerefresh_fetch::{RefreshContext, RunError};
use resumerefresh_providers::ProviderRegistry;
use resumerefresh_store::{config, ensure_resume_readable, resume_artifact};
use tracing::{debug, info};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Runs the refresh.
pub async fn run(cli: &Cli) -> Result<ExitCode> {
    let loaded = config::load(cli.config_path()).await?;
    let filter = cli.provider_filter();

    let orchestrator = ProviderRegistry::orchestrator(&loaded.config, filter.as_deref())?;
    debug!(plan = ?orchestrator.plan(), "Run plan");

    let resume = resume_artifact(&loaded.config)?;
    if !orchestrator.is_empty() {
        ensure_resume_readable(&resume).await?;
    }

    let ctx = RefreshContext::builder(resume)
        .http_settings(loaded.config.http.clone())
        .build()
        .context("failed to create HTTP client")?;

    match orchestrator.run(&ctx).await {
        Ok(report) => {
            info!("{}", report.summary());
            print_report(&report, cli)?;
            Ok(ExitCode::Success)
        }
        Err(RunError::Failed(report)) => {
            print_report(&report, cli)?;
            Ok(ExitCode::Failure)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_report(report: &RunReport, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());
            println!("{}", formatter.format_report(report));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(report)?);
        }
    }
    Ok(())
}
