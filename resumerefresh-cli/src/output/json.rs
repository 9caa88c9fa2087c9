//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use resumerefresh_core::{AppConfig, OutcomeRecord, ProviderKind, RunReport};
use resumerefresh_providers::{ProviderRegistration, ProviderRegistry};
use resumerefresh_store::LoadedConfig;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a run.
#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub success: bool,
    #[serde(serialize_with = "serialize_datetime")]
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub summary: String,
    pub providers: Vec<OutcomeRecord>,
}

/// Provider info output.
#[derive(Debug, Serialize)]
pub struct ProviderInfoOutput {
    pub id: ProviderKind,
    pub display_name: String,
    pub cli_name: String,
    pub priority: u32,
    pub default_priority: u32,
    pub enabled: bool,
    pub home_url: String,
    pub summary: String,
}

/// Effective configuration output.
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub path: String,
    pub file_found: bool,
    pub env_overrides: Vec<String>,
    pub config: AppConfig,
}

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable data.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        self.format(&Self::report_to_output(report))
    }

    fn report_to_output(report: &RunReport) -> RunOutput {
        RunOutput {
            success: report.is_success(),
            started_at: report.started_at,
            duration_ms: u64::try_from(report.duration.as_millis()).unwrap_or(u64::MAX),
            summary: report.summary(),
            providers: report.records(),
        }
    }

    /// Formats the provider list.
    pub fn format_providers(&self, registrations: &[ProviderRegistration]) -> Result<String> {
        let output: Vec<ProviderInfoOutput> = registrations
            .iter()
            .filter_map(|registration| {
                let desc = ProviderRegistry::get(registration.kind)?;
                Some(ProviderInfoOutput {
                    id: desc.id,
                    display_name: desc.display_name().to_string(),
                    cli_name: desc.cli_name().to_string(),
                    priority: registration.priority,
                    default_priority: desc.metadata.default_priority,
                    enabled: registration.enabled,
                    home_url: desc.metadata.home_url.clone(),
                    summary: desc.metadata.summary.clone(),
                })
            })
            .collect();

        self.format(&output)
    }

    /// Formats the effective configuration with passwords redacted.
    pub fn format_config(&self, loaded: &LoadedConfig) -> Result<String> {
        self.format(&ConfigOutput {
            path: loaded.path.display().to_string(),
            file_found: loaded.file_found,
            env_overrides: loaded.env_overrides.clone(),
            config: loaded.config.redacted(),
        })
    }
}
