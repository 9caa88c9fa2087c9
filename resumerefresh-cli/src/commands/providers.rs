//! Providers command - list providers and whether they will run.

use anyhow::Result;
use resumerefresh_providers::ProviderRegistry;
use resumerefresh_store::config;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let loaded = config::load(cli.config_path()).await?;
    let registrations = ProviderRegistry::registrations(&loaded.config);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());

            println!("{}", formatter.format_providers_header());
            println!("{}", "─".repeat(60));

            for registration in &registrations {
                if let Some(desc) = ProviderRegistry::get(registration.kind) {
                    println!("{}", formatter.format_provider_line(desc, registration));
                }
            }

            println!();
            println!(
                "Total: {} providers ({} enabled)",
                registrations.len(),
                registrations.iter().filter(|r| r.enabled).count()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(&registrations)?);
        }
    }

    Ok(())
}
